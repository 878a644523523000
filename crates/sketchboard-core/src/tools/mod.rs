//! Tools and the pointer-driven draw session.

use crate::palette::StylePalette;
use crate::shapes::{Arrow, Diamond, Ellipse, Line, Pencil, Rectangle, Shape, ShapeId};
use crate::store::ShapeStore;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Ellipse,
    Diamond,
    Line,
    Arrow,
    Pencil,
    Text,
    Eraser,
}

impl ToolKind {
    /// Cursor shown over the canvas while the tool is active.
    pub fn cursor(&self) -> Cursor {
        match self {
            ToolKind::Select => Cursor::Default,
            ToolKind::Pan => Cursor::Grab,
            ToolKind::Text => Cursor::Text,
            ToolKind::Eraser => Cursor::Eraser,
            ToolKind::Rectangle
            | ToolKind::Ellipse
            | ToolKind::Diamond
            | ToolKind::Line
            | ToolKind::Arrow
            | ToolKind::Pencil => Cursor::Crosshair,
        }
    }
}

/// Cursor appearance hint for the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Grab,
    Grabbing,
    Text,
    /// Eraser look. Purely cosmetic.
    Eraser,
    ResizeNwse,
    ResizeNesw,
    ResizeNs,
    ResizeEw,
}

/// State of a draw interaction.
#[derive(Debug, Clone, Default)]
pub enum DrawState {
    #[default]
    Idle,
    /// A provisional shape is being dragged out. It is not in the store yet.
    Drawing { origin: Point, shape: Shape },
}

/// Pointer-event state machine creating non-text shapes.
#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    state: DrawState,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// The shape being drawn, if any.
    pub fn provisional(&self) -> Option<&Shape> {
        match &self.state {
            DrawState::Drawing { shape, .. } => Some(shape),
            DrawState::Idle => None,
        }
    }

    /// Start drawing at `origin`. Returns false for tools that do not draw.
    pub fn begin(&mut self, tool: ToolKind, origin: Point, palette: &StylePalette) -> bool {
        let mut shape = match tool {
            ToolKind::Rectangle => Shape::Rectangle(Rectangle::from_corners(origin, origin)),
            ToolKind::Ellipse => Shape::Ellipse(Ellipse::from_rect(Rect::from_points(origin, origin))),
            ToolKind::Diamond => Shape::Diamond(Diamond::from_rect(Rect::from_points(origin, origin))),
            ToolKind::Line => Shape::Line(Line::new(origin, origin)),
            ToolKind::Arrow => Shape::Arrow(Arrow::new(origin, origin)),
            ToolKind::Pencil => Shape::Pencil(Pencil::from_points(vec![origin])),
            ToolKind::Select | ToolKind::Pan | ToolKind::Text | ToolKind::Eraser => return false,
        };
        palette.style_new_shape(&mut shape);
        self.state = DrawState::Drawing { origin, shape };
        true
    }

    /// Recompute the provisional geometry for the current pointer position.
    pub fn update(&mut self, point: Point) -> bool {
        let DrawState::Drawing { origin, shape } = &mut self.state else {
            return false;
        };
        let origin = *origin;
        let frame = Rect::from_points(origin, point);
        match shape {
            Shape::Rectangle(r) => r.set_corners(origin, point),
            Shape::Ellipse(e) => e.set_frame(frame),
            Shape::Diamond(d) => d.set_frame(frame),
            Shape::Line(l) => l.set_end(point),
            Shape::Arrow(a) => a.set_end(point),
            Shape::Pencil(p) => p.add_point(point),
            Shape::Text(_) => return false,
        }
        true
    }

    /// Apply the final point and commit the shape to the store.
    pub fn finish(&mut self, point: Point, store: &mut ShapeStore) -> Option<ShapeId> {
        self.update(point);
        match std::mem::take(&mut self.state) {
            DrawState::Drawing { shape, .. } => {
                let kind = shape.kind_name();
                let id = store.push(shape);
                log::info!("Committed {kind} {id}");
                Some(id)
            }
            DrawState::Idle => None,
        }
    }

    /// Drop the provisional shape without committing it.
    pub fn cancel(&mut self) -> Option<Shape> {
        match std::mem::take(&mut self.state) {
            DrawState::Drawing { shape, .. } => {
                log::debug!("Discarded provisional {}", shape.kind_name());
                Some(shape)
            }
            DrawState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(tool: ToolKind, from: Point, path: &[Point]) -> (ShapeStore, ShapeId) {
        let mut session = DrawSession::new();
        let mut store = ShapeStore::new();
        assert!(session.begin(tool, from, &StylePalette::default()));
        let (last, moves) = path.split_last().unwrap();
        for p in moves {
            session.update(*p);
        }
        let id = session.finish(*last, &mut store).unwrap();
        assert!(!session.is_active());
        (store, id)
    }

    #[test]
    fn test_rectangle_drag() {
        let (store, id) = draw(
            ToolKind::Rectangle,
            Point::new(50.0, 50.0),
            &[Point::new(100.0, 80.0), Point::new(150.0, 120.0)],
        );
        match store.get(id) {
            Some(Shape::Rectangle(r)) => {
                assert_eq!((r.x, r.y, r.width, r.height), (50.0, 50.0, 100.0, 70.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reverse_drag_normalizes() {
        let (store, id) = draw(
            ToolKind::Rectangle,
            Point::new(150.0, 120.0),
            &[Point::new(50.0, 50.0)],
        );
        match store.get(id) {
            Some(Shape::Rectangle(r)) => {
                assert_eq!((r.x, r.y, r.width, r.height), (50.0, 50.0, 100.0, 70.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ellipse_and_diamond_inscribed() {
        for tool in [ToolKind::Ellipse, ToolKind::Diamond] {
            let (store, id) = draw(tool, Point::new(100.0, 0.0), &[Point::new(0.0, 40.0)]);
            let bounds = store.get(id).unwrap().bounds();
            assert_eq!(bounds, Rect::new(0.0, 0.0, 100.0, 40.0));
        }
    }

    #[test]
    fn test_line_follows_pointer() {
        let (store, id) = draw(
            ToolKind::Arrow,
            Point::new(10.0, 10.0),
            &[Point::new(30.0, 30.0), Point::new(5.0, 60.0)],
        );
        match store.get(id) {
            Some(Shape::Arrow(a)) => {
                assert_eq!(a.start(), Point::new(10.0, 10.0));
                assert_eq!(a.end(), Point::new(5.0, 60.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_pencil_accumulates() {
        let (store, id) = draw(
            ToolKind::Pencil,
            Point::ZERO,
            &[Point::new(1.0, 1.0), Point::new(2.0, 3.0), Point::new(4.0, 4.0)],
        );
        match store.get(id) {
            Some(Shape::Pencil(p)) => assert_eq!(p.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_provisional_not_in_store() {
        let mut session = DrawSession::new();
        let store = ShapeStore::new();
        session.begin(ToolKind::Line, Point::ZERO, &StylePalette::default());
        session.update(Point::new(5.0, 5.0));
        assert!(session.provisional().is_some());
        assert!(store.is_empty());
        assert!(session.cancel().is_some());
        assert!(session.provisional().is_none());
    }

    #[test]
    fn test_non_drawing_tools() {
        let mut session = DrawSession::new();
        for tool in [ToolKind::Select, ToolKind::Pan, ToolKind::Text, ToolKind::Eraser] {
            assert!(!session.begin(tool, Point::ZERO, &StylePalette::default()));
            assert!(session.provisional().is_none());
        }
        assert_eq!(ToolKind::Eraser.cursor(), Cursor::Eraser);
    }

    #[test]
    fn test_palette_applied() {
        let palette = StylePalette {
            stroke_width: 6.0,
            ..Default::default()
        };
        let mut session = DrawSession::new();
        session.begin(ToolKind::Ellipse, Point::ZERO, &palette);
        let width = session.provisional().unwrap().style().stroke_width;
        assert!((width - 6.0).abs() < f64::EPSILON);
    }
}
