//! Diamond shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rhombus centered on a point. `width`/`height` are half extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diamond {
    pub(crate) id: ShapeId,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Diamond {
    pub fn new(center: Point, half_width: f64, half_height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center_x: center.x,
            center_y: center.y,
            width: half_width,
            height: half_height,
            style: ShapeStyle::default(),
            is_deleted: false,
        }
    }

    /// Create a diamond inscribed in a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let mut diamond = Self::new(Point::ZERO, 0.0, 0.0);
        diamond.set_frame(rect);
        diamond
    }

    /// Re-fit to a bounding frame, keeping id and style.
    pub fn set_frame(&mut self, rect: Rect) {
        let center = rect.center();
        self.center_x = center.x;
        self.center_y = center.y;
        self.width = rect.width() / 2.0;
        self.height = rect.height() / 2.0;
    }

    /// Vertices in drawing order: top, right, bottom, left.
    pub fn vertices(&self) -> [Point; 4] {
        let (cx, cy) = (self.center_x, self.center_y);
        [
            Point::new(cx, cy - self.height),
            Point::new(cx + self.width, cy),
            Point::new(cx, cy + self.height),
            Point::new(cx - self.width, cy),
        ]
    }
}

impl ShapeTrait for Diamond {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        super::points_bounds(&self.vertices())
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
    fn test_vertices_order() {
        let d = Diamond::new(Point::new(10.0, 10.0), 5.0, 3.0);
        let [top, right, bottom, left] = d.vertices();
        assert_eq!(top, Point::new(10.0, 7.0));
        assert_eq!(right, Point::new(15.0, 10.0));
        assert_eq!(bottom, Point::new(10.0, 13.0));
        assert_eq!(left, Point::new(5.0, 10.0));
    }

    #[test]
    fn test_bounds() {
        let d = Diamond::from_rect(Rect::new(0.0, 0.0, 40.0, 20.0));
        let b = d.bounds();
        assert_eq!(b, Rect::new(0.0, 0.0, 40.0, 20.0));
    }
}
