use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dart3d::types::{
    DART_FLIGHT_SIZE, DART_GRAB_RADIUS, DART_SHAFT_LENGTH, DART_SHAFT_RADIUS, DART_TIP_LENGTH,
};

/// Meshes and colliders for one dart. The tip points along local -Z
/// (`Transform::forward`).
pub struct DartParts {
    pub shaft: Mesh,
    pub tip: Mesh,
    pub flight: Mesh,
    /// Offsets of the tip and the flights from the dart origin.
    pub tip_offset: Vec3,
    pub flight_offset: Vec3,
    pub body_collider: Collider,
    pub grab_collider: Collider,
}

pub fn create_dart_parts() -> DartParts {
    // Cylinder and cone meshes are built along +Y.
    let shaft = Mesh::from(Cylinder::new(DART_SHAFT_RADIUS, DART_SHAFT_LENGTH))
        .rotated_by(Quat::from_rotation_x(FRAC_PI_2));
    let tip = Mesh::from(Cone {
        radius: DART_SHAFT_RADIUS,
        height: DART_TIP_LENGTH,
    })
    .rotated_by(Quat::from_rotation_x(-FRAC_PI_2));
    let flight = Mesh::from(Cuboid::new(DART_FLIGHT_SIZE, DART_FLIGHT_SIZE, 0.001))
        .rotated_by(Quat::from_rotation_y(FRAC_PI_2));

    let half_shaft = DART_SHAFT_LENGTH / 2.0;
    let tip_offset = Vec3::new(0.0, 0.0, -(half_shaft + DART_TIP_LENGTH / 2.0));
    let flight_offset = Vec3::new(0.0, 0.0, half_shaft - DART_FLIGHT_SIZE / 2.0);

    // Capsule covers shaft and tip.
    let body_collider = Collider::capsule_z(half_shaft, DART_SHAFT_RADIUS * 2.0);
    let grab_collider = Collider::ball(DART_GRAB_RADIUS);

    DartParts {
        shaft,
        tip,
        flight,
        tip_offset,
        flight_offset,
        body_collider,
        grab_collider,
    }
}
