//! Ellipse shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned ellipse. `width`/`height` are the radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    pub center_x: f64,
    pub center_y: f64,
    /// Horizontal radius.
    pub width: f64,
    /// Vertical radius.
    pub height: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center_x: center.x,
            center_y: center.y,
            width: radius_x,
            height: radius_y,
            style: ShapeStyle::default(),
            is_deleted: false,
        }
    }

    /// Create an ellipse inscribed in a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let mut ellipse = Self::new(Point::ZERO, 0.0, 0.0);
        ellipse.set_frame(rect);
        ellipse
    }

    /// Re-fit to a bounding frame, keeping id and style.
    pub fn set_frame(&mut self, rect: Rect) {
        let center = rect.center();
        self.center_x = center.x;
        self.center_y = center.y;
        self.width = rect.width() / 2.0;
        self.height = rect.height() / 2.0;
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center_x - self.width,
            self.center_y - self.height,
            self.center_x + self.width,
            self.center_y + self.height,
        )
        .abs()
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
    fn test_ellipse_creation() {
        let ellipse = Ellipse::new(Point::new(50.0, 50.0), 30.0, 20.0);
        assert!((ellipse.center_x - 50.0).abs() < f64::EPSILON);
        assert!((ellipse.width - 30.0).abs() < f64::EPSILON);
        assert!((ellipse.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_rect() {
        let ellipse = Ellipse::from_rect(Rect::new(0.0, 0.0, 100.0, 40.0));
        assert!((ellipse.center_x - 50.0).abs() < f64::EPSILON);
        assert!((ellipse.center_y - 20.0).abs() < f64::EPSILON);
        assert!((ellipse.width - 50.0).abs() < f64::EPSILON);
        assert!((ellipse.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let ellipse = Ellipse::new(Point::new(50.0, 50.0), 30.0, 20.0);
        let bounds = ellipse.bounds();
        assert!((bounds.x0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 30.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 80.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }
}
