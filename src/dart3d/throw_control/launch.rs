//! Launch Policies
//!
//! Turns the pointer motion sampled at release into the push the dart gets
//! when it leaves the player's hand. Launch vectors are expressed in view
//! space: `x` is camera right, `y` is world up and `z` is the camera's
//! forward direction flattened onto the ground plane.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Launch angles are capped below vertical so `tan` stays finite.
pub const MAX_LAUNCH_ANGLE_DEGREES: f32 = 89.0;

/// The release point never counts as lower than one pixel above the bottom
/// edge (keeps the velocity policy's `height / y` ratio finite).
pub const MIN_RELEASE_HEIGHT_PX: f32 = 1.0;

/// How a release sample becomes a launch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LaunchPolicy {
    /// Instantaneous impulse. Horizontal components scale linearly with the
    /// pointer velocity; the vertical component is the horizontal magnitude
    /// times `tan(angle)`, with the angle mapped from the release height
    /// (bottom of the screen = 0, top = `max_angle_degrees`).
    Impulse {
        lateral_scale: f32,
        forward_scale: f32,
        max_angle_degrees: f32,
    },
    /// Direct velocity. Each axis scales the pointer velocity; the vertical
    /// axis is additionally scaled by `screen_height / release_height`.
    Velocity {
        lateral_scale: f32,
        forward_scale: f32,
        vertical_scale: f32,
    },
}

impl Default for LaunchPolicy {
    fn default() -> Self {
        Self::default_impulse()
    }
}

impl LaunchPolicy {
    pub fn default_impulse() -> Self {
        Self::Impulse {
            lateral_scale: 0.000_02,
            forward_scale: 0.000_08,
            max_angle_degrees: 60.0,
        }
    }

    pub fn default_velocity() -> Self {
        Self::Velocity {
            lateral_scale: 0.000_5,
            forward_scale: 0.002,
            vertical_scale: 0.000_5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Impulse { .. } => "impulse",
            Self::Velocity { .. } => "velocity",
        }
    }

    /// Check that every constant is usable.
    pub fn validate(&self) -> Result<(), String> {
        let scales = match *self {
            Self::Impulse {
                lateral_scale,
                forward_scale,
                max_angle_degrees,
            } => {
                if !(0.0..=MAX_LAUNCH_ANGLE_DEGREES).contains(&max_angle_degrees) {
                    return Err(format!(
                        "max_angle_degrees must be within 0..={}, got {}",
                        MAX_LAUNCH_ANGLE_DEGREES, max_angle_degrees
                    ));
                }
                [lateral_scale, forward_scale, 0.0]
            }
            Self::Velocity {
                lateral_scale,
                forward_scale,
                vertical_scale,
            } => [lateral_scale, forward_scale, vertical_scale],
        };

        if scales.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(format!(
                "{} policy scales must be finite and non-negative",
                self.name()
            ));
        }

        Ok(())
    }

    /// Compute the launch for a release sample.
    pub fn launch(&self, sample: &ReleaseSample) -> Launch {
        let v = sample.pointer_velocity;

        match *self {
            Self::Impulse {
                lateral_scale,
                forward_scale,
                max_angle_degrees,
            } => {
                let lateral = v.x * lateral_scale;
                let forward = v.y * forward_scale;
                let horizontal = Vec2::new(lateral, forward).length();
                let angle = launch_angle(sample.height_ratio(), max_angle_degrees);
                let vertical = horizontal * angle.tan();

                Launch::Impulse(finite_or_zero(Vec3::new(lateral, vertical, forward)))
            }
            Self::Velocity {
                lateral_scale,
                forward_scale,
                vertical_scale,
            } => {
                let vertical = v.y * vertical_scale * sample.inverse_height_scale();

                Launch::Velocity(finite_or_zero(Vec3::new(
                    v.x * lateral_scale,
                    vertical,
                    v.y * forward_scale,
                )))
            }
        }
    }
}

/// Map a normalized release height onto a launch angle in radians.
pub fn launch_angle(height_ratio: f32, max_angle_degrees: f32) -> f32 {
    let max = max_angle_degrees.clamp(0.0, MAX_LAUNCH_ANGLE_DEGREES);
    let ratio = if height_ratio.is_finite() {
        height_ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (ratio * max).to_radians()
}

/// Pointer velocity estimate from two consecutive samples.
pub fn pointer_velocity(previous: Vec2, current: Vec2, dt: f32) -> Vec2 {
    if !dt.is_finite() || dt <= 0.0 {
        return Vec2::ZERO;
    }

    let velocity = (current - previous) / dt;
    if velocity.is_finite() {
        velocity
    } else {
        Vec2::ZERO
    }
}

fn finite_or_zero(v: Vec3) -> Vec3 {
    Vec3::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
        if v.z.is_finite() { v.z } else { 0.0 },
    )
}

/// Pointer state captured on the frame the button is released.
///
/// Screen coordinates are y-up: `0` is the bottom edge of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleaseSample {
    /// Pixels per second.
    pub pointer_velocity: Vec2,
    /// Pixels above the bottom edge.
    pub release_height: f32,
    pub screen_height: f32,
}

impl ReleaseSample {
    /// Build a sample from the previous and current pointer positions.
    /// Without a previous position the pointer is treated as stationary.
    pub fn new(previous: Option<Vec2>, current: Vec2, dt: f32, screen_height: f32) -> Self {
        let pointer_velocity = previous
            .map(|previous| pointer_velocity(previous, current, dt))
            .unwrap_or(Vec2::ZERO);

        Self {
            pointer_velocity,
            release_height: current.y,
            screen_height,
        }
    }

    /// Release height normalized to `0..=1` (bottom to top).
    pub fn height_ratio(&self) -> f32 {
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            return 0.0;
        }
        (self.release_height / self.screen_height).clamp(0.0, 1.0)
    }

    /// `screen_height / release_height`, with the release height clamped to
    /// at least one pixel. An unusable screen height yields `1.0`.
    pub fn inverse_height_scale(&self) -> f32 {
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            return 1.0;
        }
        let height = if self.release_height.is_finite() {
            self.release_height.max(MIN_RELEASE_HEIGHT_PX)
        } else {
            MIN_RELEASE_HEIGHT_PX
        };
        self.screen_height / height
    }
}

/// The push handed to the physics body on the launch step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Launch {
    /// View-space impulse (N·s).
    Impulse(Vec3),
    /// View-space linear velocity (m/s).
    Velocity(Vec3),
}

impl Launch {
    pub fn vector(&self) -> Vec3 {
        match *self {
            Launch::Impulse(v) | Launch::Velocity(v) => v,
        }
    }

    /// Velocity change this launch causes on a body of the given mass.
    pub fn velocity_change(&self, mass: f32) -> Vec3 {
        match *self {
            Launch::Impulse(impulse) => {
                if mass.is_finite() && mass > f32::EPSILON {
                    impulse / mass
                } else {
                    Vec3::ZERO
                }
            }
            Launch::Velocity(velocity) => velocity,
        }
    }

    /// Same launch, expressed in world space.
    pub fn to_world(&self, camera: &GlobalTransform) -> Vec3 {
        view_to_world(camera, self.vector())
    }
}

/// Convert a view-space vector (right, up, flattened forward) to world space.
pub fn view_to_world(camera: &GlobalTransform, local: Vec3) -> Vec3 {
    let forward = flat_forward(camera);
    let right = forward.cross(Vec3::Y);

    right * local.x + Vec3::Y * local.y + forward * local.z
}

fn flat_forward(camera: &GlobalTransform) -> Vec3 {
    let forward = camera.forward();
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    if let Some(dir) = flat.try_normalize() {
        return dir;
    }

    // Looking straight down (or up): the camera's up vector points where
    // "forward" is on screen.
    let up = camera.up();
    Vec3::new(up.x, 0.0, up.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(velocity: Vec2, height: f32) -> ReleaseSample {
        ReleaseSample {
            pointer_velocity: velocity,
            release_height: height,
            screen_height: 720.0,
        }
    }

    #[test]
    fn test_pointer_velocity_guards_zero_dt() {
        let v = pointer_velocity(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.0);
        assert_eq!(v, Vec2::ZERO);
        let v = pointer_velocity(Vec2::ZERO, Vec2::new(100.0, 0.0), f32::NAN);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_velocity_per_second() {
        let v = pointer_velocity(Vec2::ZERO, Vec2::new(100.0, -50.0), 0.5);
        assert_eq!(v, Vec2::new(200.0, -100.0));
    }

    #[test]
    fn test_release_without_history_is_stationary() {
        let s = ReleaseSample::new(None, Vec2::new(10.0, 20.0), 1.0 / 60.0, 720.0);
        assert_eq!(s.pointer_velocity, Vec2::ZERO);
        assert_eq!(s.release_height, 20.0);
    }

    #[test]
    fn test_bottom_release_has_no_lift() {
        let launch = LaunchPolicy::default_impulse().launch(&sample(Vec2::new(0.0, 3000.0), 0.0));
        assert_eq!(launch.vector().y, 0.0);
        assert!(launch.vector().z > 0.0);
    }

    #[test]
    fn test_top_release_uses_max_angle() {
        let policy = LaunchPolicy::Impulse {
            lateral_scale: 0.0,
            forward_scale: 0.001,
            max_angle_degrees: 45.0,
        };
        let v = policy.launch(&sample(Vec2::new(0.0, 1000.0), 720.0)).vector();
        assert!((v.y - v.z).abs() < 1e-5, "45 degrees should lift as much as it pushes");
    }

    #[test]
    fn test_velocity_policy_guards_bottom_edge() {
        let launch = LaunchPolicy::default_velocity().launch(&sample(Vec2::new(0.0, 1000.0), 0.0));
        assert!(launch.vector().is_finite());
        // height / 1px
        let expected = 1000.0 * 0.000_5 * 720.0;
        assert!((launch.vector().y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_change_divides_by_mass() {
        let launch = Launch::Impulse(Vec3::new(0.0, 0.0, 0.1));
        assert!((launch.velocity_change(0.025).z - 4.0).abs() < 1e-5);
        assert_eq!(launch.velocity_change(0.0), Vec3::ZERO);
    }

    #[test]
    fn test_view_to_world_follows_camera_heading() {
        let camera = GlobalTransform::from(
            Transform::from_xyz(0.0, 0.0, 0.0).looking_to(Vec3::Z, Vec3::Y),
        );
        let world = view_to_world(&camera, Vec3::new(0.0, 1.0, 2.0));
        assert!((world - Vec3::new(0.0, 1.0, 2.0)).length() < 1e-5);

        // Camera looking along +Z has its right hand pointing at -X.
        let world = view_to_world(&camera, Vec3::X);
        assert!((world - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_validate_rejects_bad_constants() {
        let policy = LaunchPolicy::Impulse {
            lateral_scale: -1.0,
            forward_scale: 0.0,
            max_angle_degrees: 30.0,
        };
        assert!(policy.validate().is_err());

        let policy = LaunchPolicy::Impulse {
            lateral_scale: 0.0,
            forward_scale: 0.0,
            max_angle_degrees: 90.0,
        };
        assert!(policy.validate().is_err());
        assert!(LaunchPolicy::default_velocity().validate().is_ok());
    }
}
