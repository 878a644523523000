//! Arrow shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;
use uuid::Uuid;

/// Arrowhead drawn at the end point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrowHead {
    /// Two open strokes.
    #[default]
    Open,
    /// Solid triangle filled with the stroke color.
    FilledTriangle,
    /// Unfilled triangle.
    OutlinedTriangle,
}

/// A straight arrow (line with arrowhead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default)]
    pub head: ArrowHead,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Arrow {
    /// Length of each arrowhead barb.
    pub const HEAD_LENGTH: f64 = 20.0;
    /// Angle of the barbs relative to the shaft.
    pub const HEAD_ANGLE: f64 = FRAC_PI_6;

    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
            head: ArrowHead::default(),
            style: ShapeStyle::default(),
            is_deleted: false,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    pub fn set_end(&mut self, end: Point) {
        self.end_x = end.x;
        self.end_y = end.y;
    }

    /// Angle of the shaft in radians.
    pub fn angle(&self) -> f64 {
        (self.end_y - self.start_y).atan2(self.end_x - self.start_x)
    }

    /// The two barb tips, rooted at the end point at ±30° from the shaft.
    pub fn head_points(&self) -> [Point; 2] {
        let angle = self.angle();
        let end = self.end();
        let barb = |a: f64| {
            Point::new(
                end.x - Self::HEAD_LENGTH * a.cos(),
                end.y - Self::HEAD_LENGTH * a.sin(),
            )
        };
        [barb(angle - Self::HEAD_ANGLE), barb(angle + Self::HEAD_ANGLE)]
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let [left, right] = self.head_points();
        super::points_bounds(&[self.start(), self.end(), left, right])
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        assert!((arrow.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_head_points_horizontal() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let [a, b] = arrow.head_points();
        let back = 100.0 - 20.0 * FRAC_PI_6.cos();
        let side = 20.0 * FRAC_PI_6.sin();
        assert!((a.x - back).abs() < 1e-9);
        assert!((b.x - back).abs() < 1e-9);
        assert!((a.y + side).abs() < 1e-9);
        assert!((b.y - side).abs() < 1e-9);
        // Both barbs are 20 units from the tip.
        assert!((a.distance(arrow.end()) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_include_head() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let bounds = arrow.bounds();
        assert!(bounds.y0 < 0.0);
        assert!(bounds.y1 > 0.0);
    }
}
