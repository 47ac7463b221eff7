use std::f32::consts::FRAC_PI_2;

/// Largest accepted `pitch_limit`; keeps the view direction off world up.
pub const MAX_PITCH_LIMIT: f32 = FRAC_PI_2 - 0.07;

/// Orbit camera tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    /// Inclusive bounds applied to the orbit distance after every mutation.
    pub min_distance: f32,
    pub max_distance: f32,

    /// Pitch is kept within `[-pitch_limit, pitch_limit]` radians.
    ///
    /// Must stay below `FRAC_PI_2`: at exactly ±90° the view direction is parallel
    /// to world up and the look-at basis degenerates.
    pub pitch_limit: f32,

    /// Target translation speed (world units per second) for movement keys.
    pub move_speed: f32,
    /// Radians per pointer pixel per second while dragging.
    pub rotate_speed: f32,
    /// Distance change per second while a zoom key is held.
    pub zoom_speed: f32,
    /// Distance change per wheel line.
    pub wheel_zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            min_distance: 0.1,
            max_distance: 100.0,
            pitch_limit: 1.5,
            move_speed: 5.0,
            rotate_speed: 2.0,
            zoom_speed: 1.0,
            wheel_zoom_step: 0.5,
        }
    }
}

impl CameraConfig {
    /// Returns a copy whose ranges the camera can clamp against without panicking.
    ///
    /// - an inverted distance range is reordered; a NaN bound falls back to the default
    /// - `pitch_limit` is made non-negative and capped at [`MAX_PITCH_LIMIT`]
    ///
    /// Every correction is logged at `warn`.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut c = self;

        if c.min_distance.is_nan() || c.max_distance.is_nan() {
            log::warn!(
                "camera distance range [{}, {}] contains NaN; using defaults",
                c.min_distance,
                c.max_distance
            );
            c.min_distance = defaults.min_distance;
            c.max_distance = defaults.max_distance;
        } else if c.min_distance > c.max_distance {
            log::warn!(
                "camera distance range [{}, {}] is inverted; swapping bounds",
                c.min_distance,
                c.max_distance
            );
            std::mem::swap(&mut c.min_distance, &mut c.max_distance);
        }

        let limit = if c.pitch_limit.is_nan() {
            defaults.pitch_limit
        } else {
            c.pitch_limit.abs().min(MAX_PITCH_LIMIT)
        };
        if limit != c.pitch_limit {
            log::warn!("camera pitch limit {} adjusted to {limit}", c.pitch_limit);
            c.pitch_limit = limit;
        }

        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unchanged() {
        assert_eq!(CameraConfig::default().sanitized(), CameraConfig::default());
    }

    #[test]
    fn inverted_distance_range_is_swapped() {
        let c = CameraConfig { min_distance: 10.0, max_distance: 1.0, ..CameraConfig::default() }
            .sanitized();
        assert_eq!((c.min_distance, c.max_distance), (1.0, 10.0));
    }

    #[test]
    fn nan_distance_bound_falls_back_to_defaults() {
        let c = CameraConfig { max_distance: f32::NAN, ..CameraConfig::default() }.sanitized();
        assert_eq!((c.min_distance, c.max_distance), (0.1, 100.0));
    }

    #[test]
    fn pitch_limit_is_made_positive_and_capped() {
        let neg = CameraConfig { pitch_limit: -1.2, ..CameraConfig::default() }.sanitized();
        assert_eq!(neg.pitch_limit, 1.2);

        let wide = CameraConfig { pitch_limit: 2.0, ..CameraConfig::default() }.sanitized();
        assert_eq!(wide.pitch_limit, MAX_PITCH_LIMIT);

        let nan = CameraConfig { pitch_limit: f32::NAN, ..CameraConfig::default() }.sanitized();
        assert_eq!(nan.pitch_limit, 1.5);
    }
}
