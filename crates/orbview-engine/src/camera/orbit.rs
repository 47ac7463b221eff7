use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use crate::input::{InputSource, Key, MouseButton};

use super::CameraConfig;

/// Distance used by `OrbitCamera::new` and `reset`.
const DEFAULT_DISTANCE: f32 = 5.0;

/// Below this eye/target separation `set_position` cannot recover a direction.
const MIN_RECONSTRUCT_DISTANCE: f32 = 1e-3;

/// Camera orbiting a target point.
///
/// Invariants, held after every public mutation:
/// - `distance` lies in `[config.min_distance, config.max_distance]`
/// - `pitch` lies in `[-config.pitch_limit, config.pitch_limit]`
/// - `yaw` lies in `[-PI, PI)`
/// - `position == target + spherical_offset(distance, yaw, pitch)`
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: CameraConfig,

    target: Vec3,
    position: Vec3,
    up: Vec3,

    distance: f32,
    yaw: f32,
    pitch: f32,

    /// Pointer position at the previous poll while the orbit button was held.
    drag_anchor: Option<(f32, f32)>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl OrbitCamera {
    /// Creates a camera looking at the origin from `+Z` at the default distance.
    ///
    /// `config` is passed through [`CameraConfig::sanitized`] first.
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            config: config.sanitized(),
            target: Vec3::ZERO,
            position: Vec3::ZERO,
            up: Vec3::Y,
            distance: DEFAULT_DISTANCE,
            yaw: 0.0,
            pitch: 0.0,
            drag_anchor: None,
        };
        camera.distance = camera.clamp_distance(DEFAULT_DISTANCE);
        camera.update_position();
        camera
    }

    /// Restores the default framing: origin target, default distance, zero angles.
    pub fn reset(&mut self) {
        self.target = Vec3::ZERO;
        self.distance = self.clamp_distance(DEFAULT_DISTANCE);
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.drag_anchor = None;
        self.update_position();
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn aspect(&self) -> f32 {
        self.config.aspect
    }

    // ── orbit parameters ──────────────────────────────────────────────────

    /// Moves the look-at point; the orbit shape around it is preserved.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_position();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.clamp_distance(distance);
        self.update_position();
    }

    pub fn set_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = wrap_angle(yaw);
        self.pitch = self.clamp_pitch(pitch);
        self.update_position();
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_angles(self.yaw + delta_yaw, self.pitch + delta_pitch);
    }

    pub fn zoom(&mut self, delta_distance: f32) {
        self.set_distance(self.distance + delta_distance);
    }

    /// Zooms by wheel lines; positive lines move the eye toward the target.
    pub fn zoom_wheel(&mut self, lines: f32) {
        if lines != 0.0 {
            self.zoom(-lines * self.config.wheel_zoom_step);
        }
    }

    /// Places the eye at `position` by reconstructing distance, yaw and pitch
    /// around the current target.
    ///
    /// When `position` is (nearly) the target no direction can be derived; the
    /// angles are kept and only the distance is updated (to its clamped value).
    pub fn set_position(&mut self, position: Vec3) {
        let to_target = self.target - position;
        let distance = to_target.length();

        if distance >= MIN_RECONSTRUCT_DISTANCE {
            let dir = to_target / distance;
            self.pitch = self.clamp_pitch((-dir.y).clamp(-1.0, 1.0).asin());
            // `dir` points from the eye to the target, the opposite of the orbit offset.
            self.yaw = wrap_angle((-dir.x).atan2(-dir.z));
        }

        self.distance = self.clamp_distance(distance);
        self.update_position();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.config.aspect = aspect;
        } else {
            log::debug!("ignoring invalid aspect ratio {aspect}");
        }
    }

    // ── input ─────────────────────────────────────────────────────────────

    /// Applies one frame of user input.
    ///
    /// - left-button drag orbits; the first polled frame of a drag only records
    ///   the pointer so stale positions never cause a jump
    /// - W/S, A/D, E/Q translate the target along the camera's forward, right
    ///   and up axes
    /// - Z/X zoom in/out
    pub fn process_input(&mut self, input: &impl InputSource, dt: f32) {
        match (input.is_button_down(MouseButton::Left), input.pointer_position()) {
            (true, Some(pointer)) => {
                if let Some((last_x, last_y)) = self.drag_anchor {
                    let dx = pointer.0 - last_x;
                    let dy = pointer.1 - last_y;
                    if dx != 0.0 || dy != 0.0 {
                        let k = self.config.rotate_speed * dt;
                        self.orbit(-dx * k, dy * k);
                    }
                }
                self.drag_anchor = Some(pointer);
            }
            _ => self.drag_anchor = None,
        }

        let axis = |pos: Key, neg: Key| -> f32 {
            (input.is_key_down(pos) as i32 - input.is_key_down(neg) as i32) as f32
        };

        let forward_amount = axis(Key::W, Key::S);
        let right_amount = axis(Key::D, Key::A);
        let up_amount = axis(Key::E, Key::Q);

        if forward_amount != 0.0 || right_amount != 0.0 || up_amount != 0.0 {
            let (forward, right, cam_up) = self.basis();
            let step = self.config.move_speed * dt;
            let offset = (forward * forward_amount + right * right_amount + cam_up * up_amount) * step;
            self.set_target(self.target + offset);
        }

        let zoom_amount = axis(Key::X, Key::Z);
        if zoom_amount != 0.0 {
            self.zoom(zoom_amount * self.config.zoom_speed * dt);
        }
    }

    // ── matrices ──────────────────────────────────────────────────────────

    /// Right-handed look-at matrix from `position` toward `target`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed perspective projection.
    ///
    /// Column-major entries: `m[0] = 1/(aspect·tan(fov/2))`, `m[5] = 1/tan(fov/2)`,
    /// `m[10] = -(far+near)/(far-near)`, `m[11] = -1`, `m[14] = -2·far·near/(far-near)`.
    pub fn projection_matrix(&self) -> Mat4 {
        let c = &self.config;
        Mat4::perspective_rh_gl(c.fov_degrees.to_radians(), c.aspect, c.near, c.far)
    }

    /// `(forward, right, up)` unit vectors of the camera frame.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let cam_up = right.cross(forward);
        (forward, right, cam_up)
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn update_position(&mut self) {
        self.position = self.target + spherical_offset(self.distance, self.yaw, self.pitch);
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        if distance.is_nan() {
            return self.config.min_distance;
        }
        distance.clamp(self.config.min_distance, self.config.max_distance)
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        if pitch.is_nan() {
            return self.pitch;
        }
        pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit)
    }
}

/// Offset of the eye from the target for the given orbit parameters.
fn spherical_offset(distance: f32, yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(
        distance * cos_pitch * sin_yaw,
        distance * sin_pitch,
        distance * cos_pitch * cos_yaw,
    )
}

/// Wraps an angle into `[-PI, PI)`. Non-finite input maps to zero.
fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::input::{
        InputEvent, InputFrame, InputState, KeyState, Modifiers, MouseButtonState,
        PointerButtonEvent, PointerMoveEvent,
    };

    const EPS: f32 = 1e-4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn default_camera_sits_on_positive_z() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.target(), Vec3::ZERO);
        assert_eq!(cam.distance(), 5.0);
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn orbit_quarter_turn_moves_to_positive_x() {
        let mut cam = OrbitCamera::default();
        cam.orbit(FRAC_PI_2, 0.0);
        assert!(approx(cam.position(), Vec3::new(5.0, 0.0, 0.0)), "{:?}", cam.position());
    }

    #[test]
    fn reset_restores_default_framing() {
        let mut cam = OrbitCamera::default();
        cam.set_target(Vec3::new(1.0, 2.0, 3.0));
        cam.orbit(1.0, 0.5);
        cam.zoom(10.0);
        cam.reset();
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, 5.0)));
    }

    // ── clamps ────────────────────────────────────────────────────────────

    #[test]
    fn pitch_stays_within_limit() {
        let mut cam = OrbitCamera::default();
        for pitch in [-10.0, -1.6, -1.5, -0.3, 0.0, 0.7, 1.5, 1.57, 3.0, 100.0] {
            cam.set_angles(0.3, pitch);
            assert!(cam.pitch().abs() <= 1.5, "pitch {pitch} -> {}", cam.pitch());
        }
        cam.set_angles(0.0, 0.0);
        for _ in 0..50 {
            cam.orbit(0.7, 0.2);
            assert!(cam.pitch().abs() <= 1.5);
        }
        for _ in 0..50 {
            cam.orbit(-0.7, -0.2);
            assert!(cam.pitch().abs() <= 1.5);
        }
    }

    #[test]
    fn distance_stays_within_range() {
        let mut cam = OrbitCamera::default();
        for d in [-5.0, 0.0, 0.05, 0.1, 3.0, 100.0, 1e6] {
            cam.set_distance(d);
            assert!((0.1..=100.0).contains(&cam.distance()), "{d} -> {}", cam.distance());
        }
        cam.set_distance(1.0);
        cam.zoom(-50.0);
        assert_eq!(cam.distance(), 0.1);
        cam.zoom(500.0);
        assert_eq!(cam.distance(), 100.0);
    }

    #[test]
    fn yaw_wraps() {
        let mut cam = OrbitCamera::default();
        cam.set_angles(3.0 * PI, 0.0);
        assert!(cam.yaw().abs() <= PI + EPS);
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn nan_inputs_do_not_poison_state() {
        let mut cam = OrbitCamera::default();
        cam.set_angles(f32::NAN, f32::NAN);
        cam.set_distance(f32::NAN);
        assert!(cam.position().is_finite());
    }

    #[test]
    fn inverted_distance_range_does_not_panic() {
        let mut cam = OrbitCamera::new(CameraConfig {
            min_distance: 10.0,
            max_distance: 1.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.distance(), 5.0);
        cam.zoom(100.0);
        assert_eq!(cam.distance(), 10.0);
    }

    #[test]
    fn negative_pitch_limit_still_clamps() {
        let mut cam = OrbitCamera::new(CameraConfig {
            pitch_limit: -1.5,
            ..CameraConfig::default()
        });
        cam.orbit(0.1, 0.1);
        assert!((cam.pitch() - 0.1).abs() < EPS);
        cam.orbit(0.0, 10.0);
        assert!((cam.pitch() - 1.5).abs() < EPS);
    }

    #[test]
    fn pitch_limit_past_vertical_keeps_view_finite() {
        let mut cam = OrbitCamera::new(CameraConfig {
            pitch_limit: 2.0,
            ..CameraConfig::default()
        });
        cam.orbit(0.0, 10.0);
        assert!(cam.pitch() <= crate::camera::MAX_PITCH_LIMIT);
        assert!(cam.view_matrix().is_finite());
        cam.orbit(0.0, -20.0);
        assert!(cam.pitch() >= -crate::camera::MAX_PITCH_LIMIT);
        assert!(cam.view_matrix().is_finite());
    }

    // ── set_position ──────────────────────────────────────────────────────

    #[test]
    fn set_position_round_trips() {
        let mut cam = OrbitCamera::default();
        cam.set_target(Vec3::new(1.0, -2.0, 0.5));
        let positions = [
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(4.0, 1.0, -3.0),
            Vec3::new(-2.0, 3.0, 2.0),
            Vec3::new(1.0, -4.0, 6.0),
            Vec3::new(1.5, -1.8, 0.6),
        ];
        for p in positions {
            cam.set_position(p);
            assert!(approx(cam.position(), p), "{p:?} -> {:?}", cam.position());
        }
    }

    #[test]
    fn set_position_on_target_keeps_angles() {
        let mut cam = OrbitCamera::default();
        cam.set_angles(0.4, 0.2);
        cam.set_position(Vec3::ZERO);
        assert!((cam.yaw() - 0.4).abs() < EPS);
        assert!((cam.pitch() - 0.2).abs() < EPS);
        assert_eq!(cam.distance(), 0.1);
    }

    #[test]
    fn set_target_preserves_orbit_shape() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.5, 0.25);
        let offset = cam.position() - cam.target();
        cam.set_target(Vec3::new(3.0, 1.0, -2.0));
        assert!(approx(cam.position() - cam.target(), offset));
    }

    // ── matrices ──────────────────────────────────────────────────────────

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut cam = OrbitCamera::default();
        cam.set_target(Vec3::new(2.0, -1.0, 3.0));
        for (yaw, pitch, dist) in [(0.0, 0.0, 5.0), (1.2, 0.7, 12.0), (-2.5, -1.4, 0.5), (3.0, 1.5, 80.0)] {
            cam.set_angles(yaw, pitch);
            cam.set_distance(dist);
            let eye = cam.view_matrix().transform_point3(cam.position());
            assert!(eye.length() < 1e-3, "eye in view space: {eye:?}");
        }
    }

    #[test]
    fn view_matrix_looks_down_negative_z() {
        let cam = OrbitCamera::default();
        let target = cam.view_matrix().transform_point3(cam.target());
        assert!(approx(target, Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn projection_matches_closed_form() {
        let mut cam = OrbitCamera::new(CameraConfig {
            fov_degrees: 90.0,
            near: 0.1,
            far: 100.0,
            ..CameraConfig::default()
        });
        cam.set_aspect(1.0);
        let m = cam.projection_matrix().to_cols_array();
        assert!((m[0] - 1.0).abs() < EPS);
        assert!((m[5] - 1.0).abs() < EPS);
        assert!((m[10] + 1.002).abs() < 1e-3);
        assert_eq!(m[11], -1.0);
        assert!((m[14] + 0.2002).abs() < 1e-3);
        assert_eq!(m[15], 0.0);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = OrbitCamera::default();
        cam.set_aspect(2.0);
        cam.set_aspect(f32::INFINITY);
        cam.set_aspect(0.0);
        assert_eq!(cam.aspect(), 2.0);
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut cam = OrbitCamera::default();
        cam.set_angles(0.8, 1.5);
        let (f, r, u) = cam.basis();
        assert!((f.length() - 1.0).abs() < EPS);
        assert!((r.length() - 1.0).abs() < EPS);
        assert!((u.length() - 1.0).abs() < EPS);
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
    }

    // ── input ─────────────────────────────────────────────────────────────

    fn left(state: &mut InputState, pressed: bool, x: f32, y: f32) {
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: if pressed { MouseButtonState::Pressed } else { MouseButtonState::Released },
                x,
                y,
                modifiers: Modifiers::default(),
            }),
        );
    }

    fn move_to(state: &mut InputState, x: f32, y: f32) {
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x, y }));
    }

    fn key(state: &mut InputState, key: Key, pressed: bool) {
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key,
                state: if pressed { KeyState::Pressed } else { KeyState::Released },
                modifiers: Modifiers::default(),
                code: 0,
                repeat: false,
            },
        );
    }

    #[test]
    fn drag_start_frame_does_not_rotate() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        move_to(&mut input, 500.0, 300.0);
        left(&mut input, true, 500.0, 300.0);

        cam.process_input(&input, 0.016);
        assert_eq!(cam.yaw(), 0.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn drag_rotates_by_pointer_delta() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        left(&mut input, true, 100.0, 100.0);
        cam.process_input(&input, 0.1);

        move_to(&mut input, 110.0, 100.0);
        cam.process_input(&input, 0.1);
        // 10 px * rotate_speed 2.0 * dt 0.1
        assert!((cam.yaw() + 2.0).abs() < EPS, "yaw {}", cam.yaw());

        // Holding still produces no further rotation.
        cam.process_input(&input, 0.1);
        assert!((cam.yaw() + 2.0).abs() < EPS);
    }

    #[test]
    fn release_and_repress_does_not_jump() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        left(&mut input, true, 0.0, 0.0);
        cam.process_input(&input, 0.1);
        left(&mut input, false, 0.0, 0.0);
        cam.process_input(&input, 0.1);

        move_to(&mut input, 400.0, 400.0);
        left(&mut input, true, 400.0, 400.0);
        cam.process_input(&input, 0.1);
        assert_eq!(cam.yaw(), 0.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn forward_key_moves_target_toward_view_direction() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        key(&mut input, Key::W, true);
        cam.process_input(&input, 0.1);
        // Looking down -Z from +Z: 5 units/s * 0.1 s.
        assert!(approx(cam.target(), Vec3::new(0.0, 0.0, -0.5)));
        assert!(approx(cam.position() - cam.target(), Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn strafe_and_lift_keys_follow_camera_basis() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        key(&mut input, Key::D, true);
        key(&mut input, Key::E, true);
        cam.process_input(&input, 0.2);
        assert!(approx(cam.target(), Vec3::new(1.0, 1.0, 0.0)), "{:?}", cam.target());
    }

    #[test]
    fn zoom_keys_change_distance() {
        let mut cam = OrbitCamera::default();
        let mut input = InputState::default();
        key(&mut input, Key::Z, true);
        cam.process_input(&input, 0.5);
        assert!((cam.distance() - 4.5).abs() < EPS);

        key(&mut input, Key::Z, false);
        key(&mut input, Key::X, true);
        cam.process_input(&input, 1.0);
        assert!((cam.distance() - 5.5).abs() < EPS);
    }

    #[test]
    fn wheel_zoom_moves_toward_target() {
        let mut cam = OrbitCamera::default();
        cam.zoom_wheel(2.0);
        assert!((cam.distance() - 4.0).abs() < EPS);
    }
}
