//! Freehand pencil stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand drawing (ordered series of samples).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pencil {
    pub(crate) id: ShapeId,
    /// Samples in the order they were drawn.
    pub points: Vec<Point>,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Pencil {
    /// Create a new empty stroke.
    pub fn new() -> Self {
        Self::from_points(Vec::new())
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
            is_deleted: false,
        }
    }

    /// Add a sample to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for Pencil {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for Pencil {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        super::points_bounds(&self.points)
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
    fn test_pencil_creation() {
        let pencil = Pencil::new();
        assert!(pencil.is_empty());
    }

    #[test]
    fn test_add_points() {
        let mut pencil = Pencil::new();
        pencil.add_point(Point::new(0.0, 0.0));
        pencil.add_point(Point::new(10.0, 10.0));
        assert_eq!(pencil.len(), 2);
    }

    #[test]
    fn test_bounds() {
        let pencil = Pencil::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
        ]);
        let bounds = pencil.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_bounds() {
        assert_eq!(Pencil::new().bounds(), Rect::ZERO);
    }
}
