//! Scene setup system
//!
//! This module contains the setup function that builds the throwing range:
//! camera, light, floor, board and the dart itself.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dart3d::meshes::create_dart_parts;
use crate::dart3d::throw_control::DartControl;
use crate::dart3d::types::*;

/// Main setup system - initializes the entire 3D scene
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<DartSettings>,
) {
    // Camera at the throw line, eyes level with the board.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.65, -0.15).looking_at(BOARD_CENTER, Vec3::Y),
        MainCamera,
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, -1.0).looking_at(BOARD_CENTER, Vec3::Y),
    ));

    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(8.0, 0.2, 8.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.25, 0.18),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.1, 1.5),
        Collider::cuboid(4.0, 0.1, 4.0),
        RigidBody::Fixed,
        Friction::coefficient(0.8),
    ));

    // Wall behind the board
    let wall_z = BOARD_CENTER.z + BOARD_THICKNESS / 2.0 + 0.05;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(4.0, 3.0, 0.1))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.8, 0.78, 0.72),
            ..default()
        })),
        Transform::from_xyz(0.0, 1.5, wall_z),
        Collider::cuboid(2.0, 1.5, 0.05),
        RigidBody::Fixed,
        Dartboard,
    ));

    // Board - a cylinder turned to face the throw line
    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(BOARD_RADIUS, BOARD_THICKNESS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.1, 0.1, 0.1),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_translation(BOARD_CENTER)
            .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        Collider::cylinder(BOARD_THICKNESS / 2.0, BOARD_RADIUS),
        RigidBody::Fixed,
        Friction::coefficient(1.0),
        Restitution::coefficient(0.0),
        Dartboard,
    ));

    spawn_dart(&mut commands, &mut meshes, &mut materials, &settings);

    commands.spawn((
        Text::new("Drag the dart, release to throw\nPress R to reset"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

/// Spawn a dart waiting at the configured position, pointing at the board.
///
/// The dart starts kinematic with gravity off and no velocity, so it hangs
/// in the air until it is thrown.
pub fn spawn_dart(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    settings: &DartSettings,
) -> Entity {
    let parts = create_dart_parts();
    let position = settings.spawn_position();
    let transform = Transform::from_translation(position).looking_to(Vec3::Z, Vec3::Y);

    let metal = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.75, 0.8),
        metallic: 0.9,
        perceptual_roughness: 0.3,
        ..default()
    });
    let flight_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.1, 0.1),
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands
        .spawn((
            transform,
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            parts.body_collider,
            ColliderMassProperties::Mass(settings.dart_mass),
            GravityScale(0.0),
            Velocity::zero(),
            ExternalImpulse::default(),
            ReadMassProperties::default(),
            Ccd::enabled(),
            TransformInterpolation::default(),
            (
                Friction::coefficient(0.6),
                Restitution::coefficient(0.05),
                DartControl::default(),
                DartSpawn(transform),
                Dart,
            ),
        ))
        .with_children(|parent| {
            parent.spawn((Mesh3d(meshes.add(parts.shaft)), MeshMaterial3d(metal.clone())));
            parent.spawn((
                Mesh3d(meshes.add(parts.tip)),
                MeshMaterial3d(metal),
                Transform::from_translation(parts.tip_offset),
            ));
            parent.spawn((
                Mesh3d(meshes.add(parts.flight)),
                MeshMaterial3d(flight_mat),
                Transform::from_translation(parts.flight_offset),
            ));

            // Picking a 1 cm shaft is fiddly; this sphere only catches rays.
            parent.spawn((
                parts.grab_collider,
                Sensor,
                ColliderMassProperties::Mass(0.0),
                Transform::default(),
                DartGrabHandle,
            ));
        })
        .id()
}
