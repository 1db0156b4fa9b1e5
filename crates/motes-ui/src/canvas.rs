//! Point-cloud drawing on an egui painter.

use egui::{pos2, Color32, Painter, Pos2, Rect, Shape};
use motes_platform::{FrameView, Renderer, Result};
use tracing::debug;

/// Camera sits on the +z axis looking at the origin.
const CAMERA_Z: f32 = 20.0;
const VERTICAL_FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Perspective mapping from world space into a screen rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    center: Pos2,
    /// Screen pixels per unit of normalized height at depth 1.
    scale: f32,
    half_height: f32,
}

impl Projection {
    pub fn new(rect: Rect) -> Self {
        let half_height = rect.height() * 0.5;
        let focal = 1.0 / (VERTICAL_FOV_DEGREES.to_radians() * 0.5).tan();
        Self {
            center: rect.center(),
            scale: focal * half_height,
            half_height,
        }
    }

    /// Screen position and radius of a point sprite, or `None` when it is
    /// outside the depth range.
    pub fn project(&self, position: [f32; 3], point_size: f32) -> Option<(Pos2, f32)> {
        let [x, y, z] = position;
        let depth = CAMERA_Z - z;
        if !(NEAR..FAR).contains(&depth) {
            return None;
        }
        let screen = pos2(
            self.center.x + x * self.scale / depth,
            self.center.y - y * self.scale / depth,
        );
        // Attenuated the way point sprites are: world size over depth,
        // scaled by half the viewport height.
        let diameter = point_size * self.half_height / depth;
        Some((screen, (diameter * 0.5).max(0.5)))
    }
}

/// Premultiplied with zero alpha, which egui composites additively.
fn additive(rgb: [f32; 3]) -> Color32 {
    let [r, g, b] = rgb.map(channel_byte);
    Color32::from_rgba_premultiplied(r, g, b, 0)
}

pub(crate) fn channel_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Renderer that draws into one frame's painter.
pub struct PointPainter {
    painter: Painter,
}

impl PointPainter {
    pub fn new(painter: Painter) -> Self {
        Self { painter }
    }
}

impl Renderer for PointPainter {
    fn render_frame(&mut self, frame: &FrameView<'_>) -> Result<()> {
        if frame.size_changed {
            debug!(size = frame.point_size, "point size changed");
        }
        let projection = Projection::new(self.painter.clip_rect());
        let point_size = frame.point_size;
        let shapes = frame
            .positions
            .iter()
            .zip(frame.colors)
            .filter_map(|(position, color)| {
                let (center, radius) = projection.project(*position, point_size)?;
                Some(Shape::circle_filled(center, radius, additive(*color)))
            });
        self.painter.extend(shapes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn projection() -> Projection {
        Projection::new(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)))
    }

    #[test]
    fn test_origin_projects_to_center() {
        let (pos, _) = projection().project([0.0, 0.0, 0.0], 0.1).unwrap();
        assert_eq!(pos, pos2(400.0, 300.0));
    }

    #[test]
    fn test_y_axis_points_up() {
        let (pos, _) = projection().project([0.0, 5.0, 0.0], 0.1).unwrap();
        assert!(pos.y < 300.0);
    }

    #[test]
    fn test_points_behind_camera_are_culled() {
        assert!(projection().project([0.0, 0.0, 25.0], 0.1).is_none());
        assert!(projection().project([0.0, 0.0, CAMERA_Z], 0.1).is_none());
    }

    #[test]
    fn test_nearer_points_are_larger() {
        let p = projection();
        let (_, far) = p.project([0.0, 0.0, -20.0], 4.0).unwrap();
        let (_, near) = p.project([0.0, 0.0, 10.0], 4.0).unwrap();
        assert!(near > far);
    }

    #[test]
    fn test_additive_color() {
        let c = additive([1.0, 0.5, 0.0]);
        assert_eq!(c.a(), 0);
        assert_eq!(c.r(), 255);
        assert_eq!(c.g(), 128);
    }
}
