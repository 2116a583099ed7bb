//! Scenario description: level geometry, trigger volumes, a spawn point and a
//! scripted input timeline, loadable from JSON.

mod demo;

pub use demo::demo_scenario;

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Collider;
use crate::engine::input::InputScript;
use crate::physics::Level;
use crate::trigger::{TargetKind, TriggerAction, TriggerField, TriggerVolume};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticDesc {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    pub collider: Collider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDesc {
    pub name: String,
    pub position: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub valid_targets: Vec<TargetKind>,
    #[serde(default)]
    pub delay: f32,
    pub action: TriggerAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub spawn: Vec3,
    #[serde(default)]
    pub statics: Vec<StaticDesc>,
    #[serde(default)]
    pub triggers: Vec<TriggerDesc>,
    #[serde(default)]
    pub input: InputScript,
    /// Suggested run length in seconds.
    #[serde(default)]
    pub duration: Option<f32>,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scenario {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario '{scenario}' has a non-finite value in {item}")]
    NonFinite { scenario: String, item: String },
    #[error("scenario '{scenario}': trigger '{trigger}' has a negative delay")]
    NegativeDelay { scenario: String, trigger: String },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let raw = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Scenario =
            serde_json::from_str(&raw).map_err(|source| SceneError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Rejects content the controller is entitled to assume is valid, such as
    /// non-finite positions or move-to destinations.
    pub fn validate(&self) -> Result<(), SceneError> {
        let non_finite = |item: String| SceneError::NonFinite {
            scenario: self.name.clone(),
            item,
        };

        if !self.spawn.is_finite() {
            return Err(non_finite("spawn".to_string()));
        }
        for desc in &self.statics {
            let finite = desc.position.is_finite()
                && match desc.collider {
                    Collider::Sphere { radius } => radius.is_finite(),
                    Collider::Box { half_extents } => half_extents.is_finite(),
                    Collider::Plane { normal, offset } => normal.is_finite() && offset.is_finite(),
                };
            if !finite {
                return Err(non_finite(format!("static '{}'", desc.name)));
            }
        }
        for desc in &self.triggers {
            let destination_ok = match desc.action {
                TriggerAction::MoveTo { destination } => destination.is_finite(),
                TriggerAction::Kill => true,
            };
            if !(desc.position.is_finite() && desc.half_extents.is_finite() && destination_ok) {
                return Err(non_finite(format!("trigger '{}'", desc.name)));
            }
            if desc.delay < 0.0 {
                return Err(SceneError::NegativeDelay {
                    scenario: self.name.clone(),
                    trigger: desc.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn build_level(&self, gravity: Vec3) -> Level {
        let mut level = Level::new(gravity);
        for desc in &self.statics {
            level.spawn_static(&desc.name, desc.position, desc.collider);
        }
        level
    }

    pub fn build_triggers(&self) -> TriggerField {
        let mut field = TriggerField::new();
        for desc in &self.triggers {
            field.spawn(
                &desc.name,
                desc.position,
                TriggerVolume::new(desc.half_extents, desc.action)
                    .with_targets(desc.valid_targets.clone())
                    .with_delay(desc.delay),
            );
        }
        field
    }
}
