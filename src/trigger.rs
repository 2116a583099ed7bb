//! Trigger volumes that act on a specific controller.
//!
//! A volume latches the first time a valid occupant enters it, waits its
//! activation delay, then fires its action once. The controller it acts on is
//! handed to [`TriggerField::update`] by the host; there is no global player
//! lookup.

use glam::Vec3;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::components::{LocalTransform, Name};
use crate::controller::{count_down, PlayerController};

/// Kinds of bodies a trigger can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Player,
    Arrow,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerAction {
    /// Kill zone: spikes, pits, lava.
    Kill,
    /// Gate: walk the character to `destination`.
    MoveTo { destination: Vec3 },
}

/// Axis-aligned trigger box component.
#[derive(Debug, Clone)]
pub struct TriggerVolume {
    pub half_extents: Vec3,
    /// Empty means every kind is accepted.
    pub valid_targets: Vec<TargetKind>,
    /// Seconds between entry and the action firing.
    pub delay: f32,
    pub action: TriggerAction,
    pressed: bool,
    pending: Option<f32>,
}

impl TriggerVolume {
    pub fn new(half_extents: Vec3, action: TriggerAction) -> Self {
        Self {
            half_extents,
            valid_targets: Vec::new(),
            delay: 0.0,
            action,
            pressed: false,
            pending: None,
        }
    }

    pub fn with_targets(mut self, targets: Vec<TargetKind>) -> Self {
        self.valid_targets = targets;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn accepts(&self, kind: TargetKind) -> bool {
        self.valid_targets.is_empty() || self.valid_targets.contains(&kind)
    }

    fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let local = (point - center).abs();
        local.cmple(self.half_extents).all()
    }
}

/// All trigger volumes of a level, stored as hecs entities.
#[derive(Default)]
pub struct TriggerField {
    world: World,
}

impl TriggerField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: &str, position: Vec3, volume: TriggerVolume) -> Entity {
        self.world
            .spawn((Name(name.to_string()), LocalTransform::new(position), volume))
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn volume(&self, entity: Entity) -> Option<TriggerVolume> {
        self.world
            .get::<&TriggerVolume>(entity)
            .ok()
            .map(|volume| (*volume).clone())
    }

    /// Check `target` against every volume, advance pending delays and apply
    /// the actions that came due. Returns the volumes that fired this tick.
    pub fn update(
        &mut self,
        dt: f32,
        kind: TargetKind,
        target: &mut PlayerController,
    ) -> Vec<Entity> {
        let position = target.position();
        let mut due = Vec::new();

        for (entity, (local, volume, name)) in
            self.world
                .query_mut::<(&LocalTransform, &mut TriggerVolume, &Name)>()
        {
            let entered = !volume.pressed
                && volume.accepts(kind)
                && position.is_some_and(|p| volume.contains(local.position, p));

            if entered {
                volume.pressed = true;
                volume.pending = Some(volume.delay);
                info!(trigger = %name.0, ?kind, delay = volume.delay, "trigger_entered");
            } else if let Some(remaining) = volume.pending {
                volume.pending = Some(count_down(remaining, dt));
            }

            if volume.pending.is_some_and(|remaining| remaining <= 0.0) {
                volume.pending = None;
                due.push((entity, name.0.clone(), volume.action));
            }
        }

        let mut fired = Vec::with_capacity(due.len());
        for (entity, name, action) in due {
            let accepted = match action {
                TriggerAction::Kill => target.die(),
                TriggerAction::MoveTo { destination } => {
                    target.request_move_to_destination(destination)
                }
            };
            if accepted {
                info!(trigger = %name, ?action, "trigger_fired");
            } else {
                debug!(trigger = %name, ?action, "trigger_action_ignored");
            }
            fired.push(entity);
        }
        fired
    }
}
