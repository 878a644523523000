//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Corner treatment for rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeStyle {
    #[default]
    Sharp,
    Round,
}

impl EdgeStyle {
    /// Corner radius in world units.
    pub fn radius(&self) -> f64 {
        match self {
            EdgeStyle::Sharp => 0.0,
            EdgeStyle::Round => 20.0,
        }
    }
}

/// An axis-aligned rectangle.
///
/// Width and height may go negative after a resize; nothing re-normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub edge: EdgeStyle,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            width,
            height,
            edge: EdgeStyle::default(),
            style: ShapeStyle::default(),
            is_deleted: false,
        }
    }

    /// Create a rectangle from two drag endpoints.
    /// The top-left is the component-wise minimum, so extents are never negative.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let mut rect = Self::new(Point::ZERO, 0.0, 0.0);
        rect.set_corners(p1, p2);
        rect
    }

    /// Re-fit this rectangle to two drag endpoints, keeping id and style.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        self.x = p1.x.min(p2.x);
        self.y = p1.y.min(p2.y);
        self.width = (p2.x - p1.x).abs();
        self.height = (p2.y - p1.y).abs();
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the rectangle as a kurbo Rect (normalized).
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
