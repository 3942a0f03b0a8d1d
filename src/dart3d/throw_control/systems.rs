//! Throw Control Systems
//!
//! `drive_dart_from_pointer` samples the mouse once per frame and advances
//! the state machine; `apply_dart_motion` runs on the fixed physics step and
//! turns the state into kinematic moves and the one-off launch.

use bevy::ecs::entity_disabling::Disabled;
use bevy::log::warn_once;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::launch::Launch;
use super::state::*;
use crate::dart3d::types::{Dart, DartSettings, MainCamera};

/// Written on the fixed step that hands a dart to physics.
#[derive(Message, Clone, Copy, Debug)]
pub struct DartLaunched {
    pub entity: Entity,
    pub launch: Launch,
    /// The launch vector in world space.
    pub world: Vec3,
}

/// Whether `hit` is the dart itself or one of its descendants.
pub fn is_part_of(hit: Entity, dart: Entity, parents: &Query<&ChildOf>) -> bool {
    let mut current = hit;
    loop {
        if current == dart {
            return true;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => return false,
        }
    }
}

/// Per-frame pointer sampling: grab, drag, release.
///
/// Skips the frame when there is no window or camera. With the cursor
/// outside the window nothing can be picked or dragged, but a release still
/// lets go of the dart.
#[allow(clippy::too_many_arguments)]
pub fn drive_dart_from_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    settings: Res<DartSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    rapier_context: ReadRapierContext,
    parents: Query<&ChildOf>,
    mut darts: Query<(Entity, &GlobalTransform, &mut DartControl), With<Dart>>,
) {
    let Ok(window) = windows.single() else {
        warn_once!("No primary window; dart input is paused");
        return;
    };

    let screen_height = window.height();
    let cursor = match window.cursor_position() {
        Some(cursor_position) => {
            let Ok((camera, camera_transform)) = camera_query.single() else {
                warn_once!("No MainCamera; dart input is paused");
                return;
            };

            // Cast ray from camera through cursor position
            match camera.viewport_to_world(camera_transform, cursor_position) {
                // Bevy's cursor is y-down; launches work in y-up screen space.
                Ok(ray) => Some(CursorSample {
                    ray,
                    position: Vec2::new(cursor_position.x, screen_height - cursor_position.y),
                    camera_forward: camera_transform.forward(),
                }),
                Err(_) => {
                    debug!("Cursor {:?} is outside the camera viewport", cursor_position);
                    None
                }
            }
        }
        None => None,
    };

    let frame = PointerFrame {
        pressed: mouse.just_pressed(MouseButton::Left),
        released: mouse.just_released(MouseButton::Left),
        cursor,
        dt: time.delta_secs(),
        screen_height,
    };

    let mut picked = None;
    if let Some(cursor) = frame.cursor.filter(|_| frame.pressed) {
        if !darts.iter().any(|(_, _, control)| control.is_dragging()) {
            let Ok(context) = rapier_context.single() else {
                warn_once!("No rapier context; darts cannot be picked");
                return;
            };
            picked = context
                .cast_ray(
                    cursor.ray.origin,
                    *cursor.ray.direction,
                    settings.max_pick_distance,
                    true,
                    settings.pick_filter(),
                )
                .map(|(entity, _toi)| entity);
        }
    }

    for (entity, transform, mut control) in darts.iter_mut() {
        let hit = picked.is_some_and(|hit| is_part_of(hit, entity, &parents));
        match control.advance(&frame, hit, transform.translation(), &settings.policy) {
            Some(PointerEvent::Grabbed) => {
                info!("Picked up dart {:?} at {}", entity, transform.translation());
            }
            Some(PointerEvent::Released(launch)) => {
                match frame.cursor {
                    Some(cursor) => info!(
                        "Released dart {:?} at {:.0}px of {:.0}px: {:?}",
                        entity, cursor.position.y, screen_height, launch
                    ),
                    None => info!("Released dart {:?} outside the window: {:?}", entity, launch),
                }
            }
            None => {}
        }
    }
}

/// Fixed-step half of the controller.
#[allow(clippy::type_complexity)]
pub fn apply_dart_motion(
    settings: Res<DartSettings>,
    camera_query: Query<&GlobalTransform, With<MainCamera>>,
    mut darts: Query<
        (
            Entity,
            &mut DartControl,
            &mut Transform,
            &mut RigidBody,
            &mut GravityScale,
            &mut Velocity,
            &mut ExternalImpulse,
            Option<&ReadMassProperties>,
        ),
        With<Dart>,
    >,
    mut launched: MessageWriter<DartLaunched>,
) {
    for (
        entity,
        mut control,
        mut transform,
        mut body,
        mut gravity,
        mut velocity,
        mut impulse,
        mass,
    ) in darts.iter_mut()
    {
        if let Some(target) = control.kinematic_target() {
            // Kinematic position-based bodies turn a Transform write into an
            // interpolated move with CCD, not a teleport.
            if transform.translation != target {
                transform.translation = target;
            }
            continue;
        }

        if !matches!(control.phase(), ThrowPhase::Released(_)) {
            continue;
        }
        let Some(launch) = control.take_launch() else {
            continue;
        };

        *body = if control.is_kinematic() {
            RigidBody::KinematicPositionBased
        } else {
            RigidBody::Dynamic
        };
        gravity.0 = if control.uses_gravity() { 1.0 } else { 0.0 };

        let camera_transform = match camera_query.single() {
            Ok(camera_transform) => *camera_transform,
            Err(_) => {
                warn!("No MainCamera at launch; using world axes for dart {:?}", entity);
                GlobalTransform::IDENTITY
            }
        };
        let world = launch.to_world(&camera_transform);

        let spin = if settings.spin_jitter > 0.0 {
            let roll = rand::thread_rng().gen_range(-settings.spin_jitter..=settings.spin_jitter);
            *transform.forward() * roll
        } else {
            Vec3::ZERO
        };

        *velocity = Velocity::zero();
        match launch {
            Launch::Impulse(_) => {
                impulse.impulse = world;
                impulse.torque_impulse = spin;
            }
            Launch::Velocity(_) => {
                velocity.linvel = world;
                velocity.angvel = spin;
            }
        }

        let mass = mass
            .map(|m| m.get().mass)
            .filter(|m| *m > 0.0)
            .unwrap_or(settings.dart_mass);
        info!(
            "Launched dart {:?} ({} policy): {} -> dv {}",
            entity,
            settings.policy.name(),
            world,
            launch.velocity_change(mass).length()
        );

        launched.write(DartLaunched {
            entity,
            launch,
            world,
        });
    }
}

/// A disabled dart must not stay stuck in the player's hand.
pub fn cancel_drag_on_disable(
    mut darts: Query<(Entity, &mut DartControl), (With<Dart>, With<Disabled>)>,
) {
    for (entity, mut control) in darts.iter_mut() {
        if control.is_in_hand() || control.previous_pointer().is_some() {
            control.cancel();
            info!("Dart {:?} disabled; drag cancelled", entity);
        }
    }
}
