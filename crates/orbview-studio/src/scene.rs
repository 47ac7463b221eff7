use std::f32::consts::TAU;

use glam::Vec3;

use orbview_engine::paint::Color;
use orbview_engine::render::{FrameError, ImmediateRenderer, DEFAULT_POINT_SIZE};

/// Static demo content: ground grid, axes, a quad and a slowly turning ring of points.
#[derive(Debug, Clone)]
pub struct DemoScene {
    /// Grid lines run from `-half_extent` to `+half_extent` on X and Z.
    pub grid_half_extent: i32,
    pub grid_spacing: f32,
    pub ring_radius: f32,
    pub ring_points: u32,
    /// Ring rotation speed in radians per second.
    pub ring_speed: f32,
    elapsed: f32,
}

impl Default for DemoScene {
    fn default() -> Self {
        Self {
            grid_half_extent: 10,
            grid_spacing: 1.0,
            ring_radius: 3.0,
            ring_points: 48,
            ring_speed: 0.5,
            elapsed: 0.0,
        }
    }
}

const GRID: Color = Color::new(0.35, 0.35, 0.38, 1.0);
const AXIS_LEN: f32 = 2.0;

impl DemoScene {
    pub fn update(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt) % (TAU / self.ring_speed.abs().max(1e-3));
    }

    /// Records the whole scene. Expects `begin_frame` to have been called.
    pub fn render(&self, r: &mut ImmediateRenderer) -> Result<(), FrameError> {
        self.render_lines(r)?;
        self.render_quad(r)?;
        self.render_ring(r)
    }

    fn render_lines(&self, r: &mut ImmediateRenderer) -> Result<(), FrameError> {
        let n = self.grid_half_extent;
        let extent = n as f32 * self.grid_spacing;

        r.begin_lines()?;
        for i in -n..=n {
            let o = i as f32 * self.grid_spacing;
            r.add_line(Vec3::new(o, 0.0, -extent), Vec3::new(o, 0.0, extent), GRID)?;
            r.add_line(Vec3::new(-extent, 0.0, o), Vec3::new(extent, 0.0, o), GRID)?;
        }

        // Axes drawn after the grid so they stay on top.
        let lift = Vec3::new(0.0, 0.001, 0.0);
        r.add_line(lift, Vec3::X * AXIS_LEN + lift, Color::RED)?;
        r.add_line(lift, Vec3::Y * AXIS_LEN + lift, Color::GREEN)?;
        r.add_line(lift, Vec3::Z * AXIS_LEN + lift, Color::BLUE)?;
        r.end_lines()
    }

    fn render_quad(&self, r: &mut ImmediateRenderer) -> Result<(), FrameError> {
        let (a, b, c, d) = (
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 1.5, -1.0),
            Vec3::new(-1.0, 1.5, -1.0),
        );

        // draw_triangle restarts the triangles batch; the second half is appended.
        r.draw_triangle(a, b, c, Color::from_rgb_u8(230, 102, 26))?;
        r.add_triangle(a, c, d, Color::from_rgb_u8(26, 128, 230))?;
        r.end_triangles()
    }

    fn render_ring(&self, r: &mut ImmediateRenderer) -> Result<(), FrameError> {
        let count = self.ring_points.max(1);
        let phase = self.elapsed * self.ring_speed;

        r.begin_points()?;
        for i in 0..count {
            let t = i as f32 / count as f32;
            let angle = t * TAU + phase;
            let pos = Vec3::new(
                self.ring_radius * angle.cos(),
                0.75,
                self.ring_radius * angle.sin(),
            );
            r.add_point(pos, ring_color(t), DEFAULT_POINT_SIZE)?;
        }
        r.end_points()
    }
}

/// Cycles through red, green and blue around the ring.
fn ring_color(t: f32) -> Color {
    let channel = |offset: f32| 0.5 + 0.5 * ((t + offset) * TAU).cos();
    Color::rgb(channel(0.0), channel(2.0 / 3.0), channel(1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbview_engine::render::{PrimitiveClass, RendererConfig};

    fn recorded(scene: &DemoScene) -> ImmediateRenderer {
        let mut r = ImmediateRenderer::new(RendererConfig::default());
        r.begin_frame().unwrap();
        scene.render(&mut r).unwrap();
        r
    }

    #[test]
    fn scene_fills_every_class() {
        let scene = DemoScene::default();
        let r = recorded(&scene);

        // 21 lines per direction plus three axes.
        assert_eq!(r.batch(PrimitiveClass::Lines).primitive_count(), 21 * 2 + 3);
        assert_eq!(r.batch(PrimitiveClass::Triangles).primitive_count(), 2);
        assert_eq!(r.batch(PrimitiveClass::Points).len(), 48);
    }

    #[test]
    fn scene_fits_default_capacity() {
        let r = recorded(&DemoScene::default());
        for class in PrimitiveClass::DRAW_ORDER {
            assert!(r.batch(class).len() <= RendererConfig::default().max_vertices_per_batch);
        }
    }

    #[test]
    fn ring_points_lie_on_the_circle() {
        let scene = DemoScene::default();
        let r = recorded(&scene);
        for v in r.batch(PrimitiveClass::Points).vertices() {
            let radial = Vec3::new(v.position.x, 0.0, v.position.z).length();
            assert!((radial - scene.ring_radius).abs() < 1e-4);
        }
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let scene = DemoScene {
            grid_half_extent: 300,
            ..DemoScene::default()
        };
        let mut r = ImmediateRenderer::new(RendererConfig::default());
        r.begin_frame().unwrap();
        assert!(matches!(
            scene.render(&mut r),
            Err(FrameError::CapacityExceeded { class: PrimitiveClass::Lines, .. })
        ));
    }

    #[test]
    fn ring_points_use_default_size() {
        let r = recorded(&DemoScene::default());
        assert!(r
            .batch(PrimitiveClass::Points)
            .vertices()
            .iter()
            .all(|v| v.size == DEFAULT_POINT_SIZE));
    }

    #[test]
    fn ring_turns_with_time() {
        let mut scene = DemoScene::default();
        let before = recorded(&scene).batch(PrimitiveClass::Points).vertices()[0].position;
        scene.update(0.5);
        let after = recorded(&scene).batch(PrimitiveClass::Points).vertices()[0].position;
        assert!((before - after).length() > 1e-3);
    }
}
