/// Straight-alpha RGBA color.
///
/// Channels are `f32` in `[0, 1]`. The immediate renderer uploads them unchanged
/// as a per-vertex attribute, so no premultiplication happens on the CPU.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from `f32` channels.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque color from `0`–`255` channel bytes.
    #[inline]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Creates a color from `0`–`255` channel bytes.
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Uniform gray with full alpha; `brightness` is clamped to `[0, 1]`.
    #[inline]
    pub fn gray(brightness: f32) -> Self {
        let v = brightness.clamp(0.0, 1.0);
        Self::rgb(v, v, v)
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to the clear-color representation used by render passes.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_maps_full_range() {
        let c = Color::from_rgba_u8(255, 0, 51, 255);
        assert_eq!(c, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn gray_clamps_brightness() {
        assert_eq!(Color::gray(2.0), Color::WHITE);
        assert_eq!(Color::gray(-1.0), Color::BLACK);
    }

    #[test]
    fn clamped_limits_every_channel() {
        let c = Color::new(1.5, -0.5, 0.5, 3.0).clamped();
        assert_eq!(c, Color::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn to_wgpu_widens_channels() {
        let c = Color::new(0.25, 0.5, 0.75, 1.0).to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }
}
