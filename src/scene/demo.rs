use glam::{Vec2, Vec3};

use super::{Scenario, StaticDesc, TriggerDesc};
use crate::components::Collider;
use crate::engine::input::{InputScript, MoveSegment};
use crate::trigger::{TargetKind, TriggerAction};

/// Built-in course used when no scenario file is given.
///
/// The character runs up a long floor along +Z, hops once, crosses a gate
/// that walks it to the far end of the course, then keeps running into a
/// lava strip. A side pit and a raised ledge sit off the path.
pub fn demo_scenario() -> Scenario {
    let statics = vec![
        StaticDesc {
            name: "floor".to_string(),
            position: Vec3::new(0.0, -0.5, 10.0),
            collider: Collider::Box {
                half_extents: Vec3::new(4.0, 0.5, 12.0),
            },
        },
        StaticDesc {
            name: "ledge".to_string(),
            position: Vec3::new(-3.0, 0.5, 4.0),
            collider: Collider::Box {
                half_extents: Vec3::new(1.0, 0.5, 1.5),
            },
        },
        StaticDesc {
            name: "pit_floor".to_string(),
            position: Vec3::new(8.0, -4.5, 10.0),
            collider: Collider::Box {
                half_extents: Vec3::new(3.0, 0.5, 12.0),
            },
        },
    ];

    let triggers = vec![
        TriggerDesc {
            name: "gate".to_string(),
            position: Vec3::new(0.0, 1.0, 8.0),
            half_extents: Vec3::new(4.0, 1.5, 0.5),
            valid_targets: vec![TargetKind::Player],
            delay: 0.0,
            action: TriggerAction::MoveTo {
                destination: Vec3::new(0.0, 0.0, 14.0),
            },
        },
        TriggerDesc {
            name: "pit".to_string(),
            position: Vec3::new(8.0, -2.5, 10.0),
            half_extents: Vec3::new(3.0, 1.5, 12.0),
            valid_targets: Vec::new(),
            delay: 0.0,
            action: TriggerAction::Kill,
        },
        TriggerDesc {
            name: "lava".to_string(),
            position: Vec3::new(0.0, 0.5, 19.0),
            half_extents: Vec3::new(4.0, 1.0, 1.5),
            valid_targets: vec![TargetKind::Player, TargetKind::Enemy],
            delay: 0.1,
            action: TriggerAction::Kill,
        },
    ];

    let input = InputScript {
        segments: vec![MoveSegment {
            start: 0.0,
            end: 8.0,
            movement: Vec2::Y,
            joystick: Vec2::ZERO,
        }],
        jumps: vec![0.5],
    };

    Scenario {
        name: "demo_course".to_string(),
        spawn: Vec3::ZERO,
        statics,
        triggers,
        input,
        duration: Some(8.0),
    }
}
