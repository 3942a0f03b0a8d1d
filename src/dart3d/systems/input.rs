//! Input handling systems
//!
//! Keyboard controls that sit outside the drag-and-throw state machine.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dart3d::throw_control::DartControl;
use crate::dart3d::types::*;

/// Press R to put every dart back at its spawn pose, kinematic and idle.
#[allow(clippy::type_complexity)]
pub fn handle_reset_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut dart_query: Query<
        (
            Entity,
            &DartSpawn,
            &mut DartControl,
            &mut Transform,
            &mut RigidBody,
            &mut GravityScale,
            &mut Velocity,
            &mut ExternalImpulse,
            Option<&mut TransformInterpolation>,
        ),
        With<Dart>,
    >,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }

    for (
        entity,
        spawn,
        mut control,
        mut transform,
        mut body,
        mut gravity,
        mut velocity,
        mut impulse,
        interpolation,
    ) in dart_query.iter_mut()
    {
        control.reset();
        *transform = spawn.0;
        *body = RigidBody::KinematicPositionBased;
        gravity.0 = 0.0;
        *velocity = Velocity::zero();
        *impulse = ExternalImpulse::default();
        // Snap instead of sliding back from wherever the dart landed.
        if let Some(mut interpolation) = interpolation {
            *interpolation = TransformInterpolation::default();
        }
        info!("Dart {:?} reset", entity);
    }
}
