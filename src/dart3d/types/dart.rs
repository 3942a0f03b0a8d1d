//! Dart-related types and components

use bevy::prelude::*;

/// Marker component for a throwable dart
#[derive(Component)]
pub struct Dart;

/// Pose the dart returns to on reset
#[derive(Component, Clone, Copy, Debug)]
pub struct DartSpawn(pub Transform);

/// Marker for the oversized sensor collider used to pick the dart up
#[derive(Component)]
pub struct DartGrabHandle;

/// Marker for the board and the wall it hangs on
#[derive(Component)]
pub struct Dartboard;

/// Physical dimensions of a dart, in meters
pub const DART_SHAFT_LENGTH: f32 = 0.12;
pub const DART_SHAFT_RADIUS: f32 = 0.004;
pub const DART_TIP_LENGTH: f32 = 0.03;
pub const DART_FLIGHT_SIZE: f32 = 0.035;
/// Radius of the invisible grab sphere around the dart
pub const DART_GRAB_RADIUS: f32 = 0.06;

/// Regulation board: 1.73 m to the bullseye, throw line 2.37 m away.
pub const BOARD_CENTER: Vec3 = Vec3::new(0.0, 1.73, 2.37);
pub const BOARD_RADIUS: f32 = 0.225;
pub const BOARD_THICKNESS: f32 = 0.04;
