//! Hit-testing, resize handle layout and resize arithmetic.

use crate::shapes::{Shape, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default handle edge length in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// One of the 8 resize handles on a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    W,
    E,
}

impl HandleKind {
    /// Hit-test order.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Nw,
        HandleKind::Ne,
        HandleKind::Sw,
        HandleKind::Se,
        HandleKind::N,
        HandleKind::S,
        HandleKind::W,
        HandleKind::E,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HandleKind::Nw => "nw",
            HandleKind::Ne => "ne",
            HandleKind::Sw => "sw",
            HandleKind::Se => "se",
            HandleKind::N => "n",
            HandleKind::S => "s",
            HandleKind::W => "w",
            HandleKind::E => "e",
        }
    }

    /// Corner or edge midpoint of `bounds` this handle sits on.
    pub fn anchor(&self, bounds: Rect) -> Point {
        let mid_x = (bounds.x0 + bounds.x1) / 2.0;
        let mid_y = (bounds.y0 + bounds.y1) / 2.0;
        match self {
            HandleKind::Nw => Point::new(bounds.x0, bounds.y0),
            HandleKind::Ne => Point::new(bounds.x1, bounds.y0),
            HandleKind::Sw => Point::new(bounds.x0, bounds.y1),
            HandleKind::Se => Point::new(bounds.x1, bounds.y1),
            HandleKind::N => Point::new(mid_x, bounds.y0),
            HandleKind::S => Point::new(mid_x, bounds.y1),
            HandleKind::W => Point::new(bounds.x0, mid_y),
            HandleKind::E => Point::new(bounds.x1, mid_y),
        }
    }

    /// Cursor hint shown while hovering the handle.
    pub fn cursor(&self) -> crate::tools::Cursor {
        use crate::tools::Cursor;
        match self {
            HandleKind::Nw | HandleKind::Se => Cursor::ResizeNwse,
            HandleKind::Ne | HandleKind::Sw => Cursor::ResizeNesw,
            HandleKind::N | HandleKind::S => Cursor::ResizeNs,
            HandleKind::W | HandleKind::E => Cursor::ResizeEw,
        }
    }
}

/// A resize handle positioned on a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Center in world coordinates.
    pub position: Point,
}

impl Handle {
    /// Square hit box of edge `size` centered on the anchor.
    pub fn hit_box(&self, size: f64) -> Rect {
        let half = size / 2.0;
        Rect::new(
            self.position.x - half,
            self.position.y - half,
            self.position.x + half,
            self.position.y + half,
        )
    }
}

/// The 8 handles of a bounding box, in hit-test order.
pub fn handles(bounds: Rect) -> [Handle; 8] {
    HandleKind::ALL.map(|kind| Handle {
        kind,
        position: kind.anchor(bounds),
    })
}

fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// First handle whose box contains `point`, in hit-test order.
pub fn hit_handle(bounds: Rect, point: Point, size: f64) -> Option<HandleKind> {
    handles(bounds)
        .into_iter()
        .find(|h| contains_inclusive(h.hit_box(size), point))
        .map(|h| h.kind)
}

/// Whether `point` hits `shape`.
///
/// Only rectangles are hit-testable. Every other kind reports a miss.
pub fn is_point_in_shape(point: Point, shape: &Shape) -> bool {
    match shape {
        Shape::Rectangle(rect) => contains_inclusive(rect.bounds(), point),
        Shape::Ellipse(_)
        | Shape::Diamond(_)
        | Shape::Line(_)
        | Shape::Arrow(_)
        | Shape::Pencil(_)
        | Shape::Text(_) => false,
    }
}

/// Un-normalized box being resized. Width/height may go negative.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn apply(&mut self, handle: HandleKind, dx: f64, dy: f64) {
        match handle {
            HandleKind::Nw => {
                self.x += dx;
                self.y += dy;
                self.width -= dx;
                self.height -= dy;
            }
            HandleKind::Ne => {
                self.y += dy;
                self.width += dx;
                self.height -= dy;
            }
            HandleKind::Sw => {
                self.x += dx;
                self.width -= dx;
                self.height += dy;
            }
            HandleKind::Se => {
                self.width += dx;
                self.height += dy;
            }
            HandleKind::N => {
                self.y += dy;
                self.height -= dy;
            }
            HandleKind::S => self.height += dy,
            HandleKind::W => {
                self.x += dx;
                self.width -= dx;
            }
            HandleKind::E => self.width += dx,
        }
    }
}

/// Resize `shape` by dragging `handle` by a world-space delta.
///
/// No clamping: dragging a handle past the opposite edge leaves a negative
/// extent. Returns false for kinds that cannot be resized.
pub fn resize(shape: &mut Shape, handle: HandleKind, dx: f64, dy: f64) -> bool {
    match shape {
        Shape::Rectangle(rect) => {
            let mut frame = Frame {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            };
            frame.apply(handle, dx, dy);
            rect.x = frame.x;
            rect.y = frame.y;
            rect.width = frame.width;
            rect.height = frame.height;
            true
        }
        Shape::Ellipse(ellipse) => {
            let (cx, cy) = (ellipse.center_x, ellipse.center_y);
            let (w, h) = (ellipse.width, ellipse.height);
            let frame = centered_resize(cx, cy, w, h, handle, dx, dy);
            (ellipse.center_x, ellipse.center_y, ellipse.width, ellipse.height) = frame;
            true
        }
        Shape::Diamond(diamond) => {
            let (cx, cy) = (diamond.center_x, diamond.center_y);
            let (w, h) = (diamond.width, diamond.height);
            let frame = centered_resize(cx, cy, w, h, handle, dx, dy);
            (diamond.center_x, diamond.center_y, diamond.width, diamond.height) = frame;
            true
        }
        Shape::Line(_) | Shape::Arrow(_) | Shape::Pencil(_) | Shape::Text(_) => false,
    }
}

/// Resize a center/half-extent shape through its bounding frame.
fn centered_resize(
    cx: f64,
    cy: f64,
    half_w: f64,
    half_h: f64,
    handle: HandleKind,
    dx: f64,
    dy: f64,
) -> (f64, f64, f64, f64) {
    let mut frame = Frame {
        x: cx - half_w,
        y: cy - half_h,
        width: half_w * 2.0,
        height: half_h * 2.0,
    };
    frame.apply(handle, dx, dy);
    (
        frame.x + frame.width / 2.0,
        frame.y + frame.height / 2.0,
        frame.width / 2.0,
        frame.height / 2.0,
    )
}
