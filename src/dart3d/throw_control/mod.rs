//! Throw Control Module
//!
//! This module handles mouse-controlled dart throwing. The player grabs the
//! dart, drags it in a plane facing the camera and flicks it; the pointer
//! motion at release decides the launch.

mod launch;
mod state;
mod systems;

pub use launch::*;
pub use state::*;
pub use systems::*;

use bevy::prelude::*;

use crate::dart3d::types::DartSettings;

/// Registers the frame-rate input system and the fixed-rate physics system.
///
/// Pair it with Rapier's `TimestepMode::Interpolated` at the `Time<Fixed>`
/// rate so physics advances in step with `apply_dart_motion`.
pub struct DartThrowPlugin;

impl Plugin for DartThrowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DartSettings>()
            .add_message::<DartLaunched>()
            .add_systems(
                Update,
                (cancel_drag_on_disable, drive_dart_from_pointer).chain(),
            )
            .add_systems(FixedUpdate, apply_dart_motion);
    }
}
