//! Throw Control State
//!
//! The drag-and-release state machine attached to every dart.
//!
//! ```text
//! Idle --press over dart--> Dragging --release--> Released --fixed step--> Thrown
//! ```
//!
//! While idle or dragging the dart is a kinematic body with gravity off; the
//! first fixed step after release hands it to the physics engine for good
//! (only [`DartControl::reset`] brings it back).

use bevy::prelude::*;

use super::launch::{Launch, LaunchPolicy, ReleaseSample};

/// Plane the dart is dragged in: through the dart, facing the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPlane {
    pub point: Vec3,
    pub normal: Dir3,
}

impl DragPlane {
    pub fn facing_camera(point: Vec3, camera_forward: Dir3) -> Self {
        Self {
            point,
            normal: -camera_forward,
        }
    }

    /// Where the ray crosses the plane. `None` when the ray runs parallel to
    /// the plane or points away from it.
    pub fn intersect(&self, ray: Ray3d) -> Option<Vec3> {
        let t = ray.intersect_plane(
            self.point,
            InfinitePlane3d {
                normal: self.normal,
            },
        )?;
        let point = ray.get_point(t);
        point.is_finite().then_some(point)
    }

    /// Signed distance from the plane.
    pub fn distance(&self, point: Vec3) -> f32 {
        (point - self.point).dot(*self.normal)
    }
}

/// Everything a drag needs, rebuilt on every grab.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGrab {
    pub plane: DragPlane,
    /// Dart position minus the grab point, constant for the whole drag.
    pub grab_offset: Vec3,
    /// Where the dart should be on the next fixed step.
    pub target: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ThrowPhase {
    #[default]
    Idle,
    Dragging(DragGrab),
    /// Released this frame; the launch is applied on the next fixed step.
    Released(Launch),
    /// Owned by the physics engine.
    Thrown,
}

impl ThrowPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ThrowPhase::Idle => "Idle",
            ThrowPhase::Dragging(_) => "Dragging",
            ThrowPhase::Released(_) => "Released",
            ThrowPhase::Thrown => "Thrown",
        }
    }
}

/// Cursor data for one frame, present while the cursor is over the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorSample {
    pub ray: Ray3d,
    /// Pointer position in y-up screen space.
    pub position: Vec2,
    pub camera_forward: Dir3,
}

/// Mouse input for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFrame {
    pub pressed: bool,
    pub released: bool,
    pub cursor: Option<CursorSample>,
    pub dt: f32,
    pub screen_height: f32,
}

/// What a frame of input did to a dart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Grabbed,
    Released(Launch),
}

/// Drag-and-throw controller for one dart.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct DartControl {
    phase: ThrowPhase,
    previous_pointer: Option<Vec2>,
    kinematic: bool,
    gravity: bool,
}

impl Default for DartControl {
    fn default() -> Self {
        Self {
            phase: ThrowPhase::Idle,
            previous_pointer: None,
            kinematic: true,
            gravity: false,
        }
    }
}

impl DartControl {
    pub fn phase(&self) -> &ThrowPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, ThrowPhase::Dragging(_))
    }

    /// Dragging, or released with the launch still pending.
    pub fn is_in_hand(&self) -> bool {
        matches!(self.phase, ThrowPhase::Dragging(_) | ThrowPhase::Released(_))
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    pub fn uses_gravity(&self) -> bool {
        self.gravity
    }

    pub fn previous_pointer(&self) -> Option<Vec2> {
        self.previous_pointer
    }

    pub fn grab(&self) -> Option<&DragGrab> {
        match &self.phase {
            ThrowPhase::Dragging(grab) => Some(grab),
            _ => None,
        }
    }

    /// Start a drag. Only succeeds while idle and when the pointer ray hit
    /// the dart.
    pub fn try_grab(
        &mut self,
        ray: Ray3d,
        hit_dart: bool,
        dart_position: Vec3,
        camera_forward: Dir3,
    ) -> bool {
        if !hit_dart || !matches!(self.phase, ThrowPhase::Idle) {
            return false;
        }

        let plane = DragPlane::facing_camera(dart_position, camera_forward);
        let grab_point = plane.intersect(ray).unwrap_or(dart_position);

        self.phase = ThrowPhase::Dragging(DragGrab {
            plane,
            grab_offset: dart_position - grab_point,
            target: dart_position,
        });
        true
    }

    /// Follow the pointer ray. A ray that misses the plane keeps the last
    /// target. Returns the current target while dragging.
    pub fn drag_to(&mut self, ray: Ray3d) -> Option<Vec3> {
        let ThrowPhase::Dragging(grab) = &mut self.phase else {
            return None;
        };

        if let Some(point) = grab.plane.intersect(ray) {
            grab.target = point + grab.grab_offset;
        }
        Some(grab.target)
    }

    /// Let go of the dart. `pointer` is y-up screen space; the velocity is
    /// estimated against the pointer recorded on the previous frame.
    pub fn release(
        &mut self,
        pointer: Vec2,
        dt: f32,
        screen_height: f32,
        policy: &LaunchPolicy,
    ) -> Option<Launch> {
        if !self.is_dragging() {
            return None;
        }

        let sample = ReleaseSample::new(self.previous_pointer, pointer, dt, screen_height);
        let launch = policy.launch(&sample);
        self.phase = ThrowPhase::Released(launch);
        Some(launch)
    }

    /// Run one frame of pointer input through the state machine.
    ///
    /// The release frame does not move the drag target: the launch starts
    /// from the position the body last reached. A release with the cursor
    /// outside the window still ends the drag, with a stationary pointer.
    pub fn advance(
        &mut self,
        frame: &PointerFrame,
        hit_dart: bool,
        dart_position: Vec3,
        policy: &LaunchPolicy,
    ) -> Option<PointerEvent> {
        let Some(cursor) = frame.cursor else {
            let event = if frame.released {
                let pointer = self.previous_pointer.unwrap_or_default();
                self.release(pointer, frame.dt, frame.screen_height, policy)
                    .map(PointerEvent::Released)
            } else {
                None
            };
            // The next sample must not measure a jump across the gap.
            self.previous_pointer = None;
            return event;
        };

        let mut event = None;
        if frame.pressed
            && self.try_grab(cursor.ray, hit_dart, dart_position, cursor.camera_forward)
        {
            event = Some(PointerEvent::Grabbed);
        }

        if frame.released {
            if let Some(launch) =
                self.release(cursor.position, frame.dt, frame.screen_height, policy)
            {
                event = Some(PointerEvent::Released(launch));
            }
        } else {
            self.drag_to(cursor.ray);
        }

        self.record_pointer(cursor.position);
        event
    }

    /// Remember this frame's pointer for the next displacement estimate.
    pub fn record_pointer(&mut self, pointer: Vec2) {
        self.previous_pointer = Some(pointer);
    }

    /// Position the kinematic body should move to on this fixed step.
    pub fn kinematic_target(&self) -> Option<Vec3> {
        self.grab().map(|grab| grab.target)
    }

    /// Hand the dart to physics. Yields the launch exactly once.
    pub fn take_launch(&mut self) -> Option<Launch> {
        let ThrowPhase::Released(launch) = self.phase else {
            return None;
        };

        self.phase = ThrowPhase::Thrown;
        self.kinematic = false;
        self.gravity = true;
        Some(launch)
    }

    /// Drop any drag or pending release, e.g. when the dart gets disabled.
    pub fn cancel(&mut self) {
        if self.is_in_hand() {
            self.phase = ThrowPhase::Idle;
        }
        self.previous_pointer = None;
    }

    /// Back to the freshly spawned state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_ray(target: Vec3) -> Ray3d {
        Ray3d::new(Vec3::ZERO, Dir3::new(target).unwrap())
    }

    #[test]
    fn test_plane_rejects_parallel_ray() {
        let plane = DragPlane::facing_camera(Vec3::new(0.0, 0.0, 5.0), Dir3::Z);
        let ray = Ray3d::new(Vec3::ZERO, Dir3::X);
        assert_eq!(plane.intersect(ray), None);
    }

    #[test]
    fn test_grab_requires_hit() {
        let mut control = DartControl::default();
        let ray = forward_ray(Vec3::Z);
        assert!(!control.try_grab(ray, false, Vec3::new(0.0, 0.0, 5.0), Dir3::Z));
        assert_eq!(*control.phase(), ThrowPhase::Idle);
    }

    #[test]
    fn test_grab_offset_is_body_minus_grab_point() {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        let ray = forward_ray(Vec3::new(0.1, 0.0, 5.0));
        assert!(control.try_grab(ray, true, body, Dir3::Z));

        let grab = control.grab().copied().unwrap();
        assert!((grab.grab_offset - Vec3::new(-0.1, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(grab.target, body);
    }

    #[test]
    fn test_cannot_grab_twice() {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        assert!(control.try_grab(forward_ray(body), true, body, Dir3::Z));
        assert!(!control.try_grab(forward_ray(body), true, body, Dir3::Z));
    }

    #[test]
    fn test_take_launch_only_once() {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        control.try_grab(forward_ray(body), true, body, Dir3::Z);
        control.record_pointer(Vec2::new(640.0, 360.0));
        control
            .release(Vec2::new(740.0, 360.0), 1.0 / 60.0, 720.0, &LaunchPolicy::default())
            .unwrap();

        assert!(control.is_kinematic());
        assert!(control.take_launch().is_some());
        assert!(!control.is_kinematic());
        assert!(control.uses_gravity());
        assert!(control.take_launch().is_none());
        assert_eq!(*control.phase(), ThrowPhase::Thrown);
    }

    #[test]
    fn test_release_while_idle_does_nothing() {
        let mut control = DartControl::default();
        let launch = control.release(Vec2::ZERO, 1.0 / 60.0, 720.0, &LaunchPolicy::default());
        assert!(launch.is_none());
        assert_eq!(*control.phase(), ThrowPhase::Idle);
    }

    #[test]
    fn test_cancel_keeps_thrown_dart_thrown() {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        control.try_grab(forward_ray(body), true, body, Dir3::Z);
        control.release(Vec2::ZERO, 1.0 / 60.0, 720.0, &LaunchPolicy::default());
        control.take_launch();

        control.cancel();
        assert_eq!(*control.phase(), ThrowPhase::Thrown);
        assert!(!control.is_kinematic());
    }

    fn frame(cursor: Option<CursorSample>, released: bool) -> PointerFrame {
        PointerFrame {
            pressed: false,
            released,
            cursor,
            dt: 1.0 / 60.0,
            screen_height: 720.0,
        }
    }

    fn cursor_at(target: Vec3, position: Vec2) -> CursorSample {
        CursorSample {
            ray: forward_ray(target),
            position,
            camera_forward: Dir3::Z,
        }
    }

    fn dragging() -> DartControl {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        control.try_grab(forward_ray(body), true, body, Dir3::Z);
        control.record_pointer(Vec2::new(640.0, 360.0));
        control
    }

    #[test]
    fn test_advance_grabs_on_press() {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        let press = PointerFrame {
            pressed: true,
            ..frame(Some(cursor_at(body, Vec2::new(640.0, 360.0))), false)
        };

        let event = control.advance(&press, true, body, &LaunchPolicy::default());
        assert_eq!(event, Some(PointerEvent::Grabbed));
        assert!(control.is_dragging());
        assert_eq!(control.previous_pointer(), Some(Vec2::new(640.0, 360.0)));
    }

    #[test]
    fn test_release_outside_window_lets_go() {
        let mut control = dragging();

        let event = control.advance(&frame(None, true), false, Vec3::ZERO, &LaunchPolicy::default());
        let Some(PointerEvent::Released(launch)) = event else {
            panic!("release outside the window must end the drag, got {:?}", event);
        };
        assert_eq!(launch.vector(), Vec3::ZERO);
        assert!(matches!(control.phase(), ThrowPhase::Released(_)));
        assert!(control.previous_pointer().is_none());
    }

    #[test]
    fn test_cursor_leaving_window_keeps_drag_but_forgets_pointer() {
        let mut control = dragging();
        let target = control.kinematic_target();

        let event = control.advance(&frame(None, false), false, Vec3::ZERO, &LaunchPolicy::default());
        assert_eq!(event, None);
        assert!(control.is_dragging());
        assert_eq!(control.kinematic_target(), target);
        assert!(control.previous_pointer().is_none());
    }

    #[test]
    fn test_release_frame_does_not_move_target() {
        let policy = LaunchPolicy::default();
        let pointer = Vec2::new(700.0, 400.0);

        let mut control = dragging();
        control.advance(
            &frame(Some(cursor_at(Vec3::new(0.2, 0.0, 5.0), Vec2::new(660.0, 380.0))), false),
            false,
            Vec3::ZERO,
            &policy,
        );
        let mut other = control.clone();

        // Same pointer sample, wildly different rays: only the pointer counts.
        control.advance(
            &frame(Some(cursor_at(Vec3::new(0.2, 0.0, 5.0), pointer)), true),
            false,
            Vec3::ZERO,
            &policy,
        );
        other.advance(
            &frame(Some(cursor_at(Vec3::new(-3.0, 2.0, 5.0), pointer)), true),
            false,
            Vec3::ZERO,
            &policy,
        );
        assert_eq!(control, other);
        assert!(matches!(control.phase(), ThrowPhase::Released(_)));
    }

    #[test]
    fn test_reset_rearms() {
        let mut control = DartControl::default();
        let body = Vec3::new(0.0, 0.0, 5.0);
        control.try_grab(forward_ray(body), true, body, Dir3::Z);
        control.release(Vec2::ZERO, 1.0 / 60.0, 720.0, &LaunchPolicy::default());
        control.take_launch();

        control.reset();
        assert_eq!(control, DartControl::default());
        assert!(control.try_grab(forward_ray(body), true, body, Dir3::Z));
    }
}
