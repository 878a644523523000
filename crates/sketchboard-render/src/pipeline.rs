//! Full-scene redraw onto a [`Surface`].

use crate::{RenderResult, RendererError};
use crate::outline::{OutlineOptions, stroke_outline};
use crate::surface::{DrawOptions, Surface};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use sketchboard_core::Canvas;
use sketchboard_core::geometry;
use sketchboard_core::presence::Participant;
use sketchboard_core::shapes::{
    Arrow, ArrowHead, FontFamily, Pencil, Rectangle, Shape, ShapeId, Text,
};
use sketchboard_core::store::ShapeStore;
use sketchboard_core::text::{EditOverlay, FontSpec};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Cubic control distance approximating a quarter circle.
const KAPPA: f64 = 0.552_284_749_8;

/// Screen-space layout of the presence roster.
const PRESENCE_MARGIN: f64 = 12.0;
const PRESENCE_ROW: f64 = 22.0;
const PRESENCE_SWATCH: f64 = 14.0;

const PRESENCE_COLORS: [Color; 6] = [
    Color::from_rgb8(59, 130, 246),
    Color::from_rgb8(239, 68, 68),
    Color::from_rgb8(16, 185, 129),
    Color::from_rgb8(245, 158, 11),
    Color::from_rgb8(139, 92, 246),
    Color::from_rgb8(236, 72, 153),
];

/// Everything one redraw needs.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// World to screen transform.
    pub transform: Affine,
    /// Current zoom, used to keep overlay strokes at a constant screen width.
    pub scale: f64,
    pub store: &'a ShapeStore,
    pub provisional: Option<&'a Shape>,
    pub selected: Option<ShapeId>,
    pub editing: Option<EditOverlay>,
    /// Handle edge length in screen pixels.
    pub handle_size: f64,
    /// Remote participants, listed in a corner of the screen.
    pub participants: &'a [Participant],
}

impl<'a> Frame<'a> {
    pub fn from_canvas(canvas: &'a Canvas, now: Instant) -> Self {
        let viewport = canvas.viewport();
        Self {
            transform: viewport.transform(),
            scale: viewport.scale,
            store: canvas.store(),
            provisional: canvas.provisional(),
            selected: canvas.selected(),
            editing: canvas.edit_overlay(now),
            handle_size: canvas.config().handle_size,
            participants: &[],
        }
    }

    pub fn with_participants(mut self, participants: &'a [Participant]) -> Self {
        self.participants = participants;
        self
    }
}

/// Draws frames onto an optional surface.
///
/// While detached every redraw is a no-op.
#[derive(Debug)]
pub struct RenderPipeline<S> {
    surface: Option<S>,
    pub background: Color,
    pub selection_color: Color,
}

impl<S: Surface> RenderPipeline<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
            ..Self::detached()
        }
    }

    pub fn detached() -> Self {
        Self {
            surface: None,
            background: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }

    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn detach(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> RenderResult<&S> {
        self.surface.as_ref().ok_or(RendererError::Detached)
    }

    pub fn surface_mut(&mut self) -> RenderResult<&mut S> {
        self.surface.as_mut().ok_or(RendererError::Detached)
    }

    /// Clear and draw the whole frame: shapes in store order, the provisional
    /// shape, the selection handles, the text edit overlay, then the
    /// presence roster in screen space.
    pub fn redraw(&mut self, frame: &Frame<'_>) {
        let (background, selection_color) = (self.background, self.selection_color);
        let Some(surface) = self.surface.as_mut() else {
            log::debug!("No surface attached, skipping redraw");
            return;
        };

        surface.clear(background);
        surface.set_transform(frame.transform);

        for shape in frame.store.visible() {
            draw_shape(surface, shape);
        }
        if let Some(shape) = frame.provisional {
            draw_shape(surface, shape);
        }

        let scale = frame.scale.max(f64::EPSILON);
        let selected = frame
            .selected
            .and_then(|id| frame.store.get(id))
            .filter(|s| !s.is_deleted());
        if let Some(shape) = selected {
            draw_handles(surface, shape.bounds(), frame.handle_size, scale, selection_color);
        }
        if let Some(overlay) = &frame.editing {
            draw_edit_overlay(surface, overlay, scale, selection_color);
        }
        if !frame.participants.is_empty() {
            draw_presence(surface, frame.participants);
        }
    }
}

/// Draw one shape with its own style.
pub fn draw_shape(surface: &mut dyn Surface, shape: &Shape) {
    let options = DrawOptions::from_style(shape.style());
    match shape {
        Shape::Rectangle(rect) => surface.path(&rectangle_path(rect), &options),
        Shape::Ellipse(ellipse) => surface.ellipse(
            ellipse.center(),
            Vec2::new(ellipse.width, ellipse.height),
            &options,
        ),
        Shape::Diamond(diamond) => surface.polygon(&diamond.vertices(), &options),
        Shape::Line(line) => surface.line(line.start(), line.end(), &options),
        Shape::Arrow(arrow) => draw_arrow(surface, arrow, &options),
        Shape::Pencil(pencil) => draw_pencil(surface, pencil, &options),
        Shape::Text(text) => draw_text(surface, text),
    }
}

/// Closed outline with four straight edges and four quarter arcs.
/// A sharp edge gives zero-radius arcs.
pub fn rectangle_path(rect: &Rectangle) -> BezPath {
    let r = rect.as_rect();
    let radius = rect
        .edge
        .radius()
        .min(r.width() / 2.0)
        .min(r.height() / 2.0);
    let k = radius * KAPPA;
    let (x0, y0, x1, y1) = (r.x0, r.y0, r.x1, r.y1);

    let mut path = BezPath::new();
    path.move_to((x0 + radius, y0));
    path.line_to((x1 - radius, y0));
    path.curve_to((x1 - radius + k, y0), (x1, y0 + radius - k), (x1, y0 + radius));
    path.line_to((x1, y1 - radius));
    path.curve_to((x1, y1 - radius + k), (x1 - radius + k, y1), (x1 - radius, y1));
    path.line_to((x0 + radius, y1));
    path.curve_to((x0 + radius - k, y1), (x0, y1 - radius + k), (x0, y1 - radius));
    path.line_to((x0, y0 + radius));
    path.curve_to((x0, y0 + radius - k), (x0 + radius - k, y0), (x0 + radius, y0));
    path.close_path();
    path
}

fn draw_arrow(surface: &mut dyn Surface, arrow: &Arrow, options: &DrawOptions) {
    let end = arrow.end();
    surface.line(arrow.start(), end, options);
    let [left, right] = arrow.head_points();
    match arrow.head {
        ArrowHead::Open => {
            surface.line(end, left, options);
            surface.line(end, right, options);
        }
        ArrowHead::OutlinedTriangle => {
            let mut outline = options.clone();
            outline.fill = None;
            surface.polygon(&[end, left, right], &outline);
        }
        ArrowHead::FilledTriangle => {
            let filled = options.clone().with_solid_fill(options.stroke);
            surface.polygon(&[end, left, right], &filled);
        }
    }
}

fn draw_pencil(surface: &mut dyn Surface, pencil: &Pencil, options: &DrawOptions) {
    if pencil.len() < 2 {
        return;
    }
    let outline = stroke_outline(
        &pencil.points,
        &OutlineOptions::for_stroke_width(options.stroke_width),
    );
    surface.fill_polygon(&outline, options.stroke);
}

fn draw_text(surface: &mut dyn Surface, text: &Text) {
    let font = text.font();
    let line_height = font.line_height_px();
    let color: Color = text.color.into();
    for (i, line) in text.text.split('\n').enumerate() {
        let origin = Point::new(text.x, text.y + i as f64 * line_height);
        surface.fill_text(line, origin, &font, color);
    }
}

fn draw_handles(surface: &mut dyn Surface, bounds: Rect, size: f64, scale: f64, color: Color) {
    surface.stroke_rect(bounds, color, 1.0 / scale);
    for handle in geometry::handles(bounds) {
        let hit_box = handle.hit_box(size / scale);
        surface.fill_rect(hit_box, Color::WHITE);
        surface.stroke_rect(hit_box, color, 1.5 / scale);
    }
}

fn draw_edit_overlay(surface: &mut dyn Surface, overlay: &EditOverlay, scale: f64, color: Color) {
    surface.stroke_rect(overlay.frame, color.with_alpha(0.5), 1.0 / scale);
    for rect in &overlay.selection {
        surface.fill_rect(*rect, color.with_alpha(0.3));
    }
    if let Some((top, bottom)) = overlay.caret {
        surface.line(top, bottom, &DrawOptions::plain(Color::BLACK, 1.5 / scale));
    }
}

/// Stable color for a participant, so a user keeps the same swatch.
fn participant_color(participant: &Participant) -> Color {
    let hash = participant
        .id
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    PRESENCE_COLORS[hash % PRESENCE_COLORS.len()]
}

fn draw_presence(surface: &mut dyn Surface, participants: &[Participant]) {
    surface.set_transform(Affine::IDENTITY);
    let font = FontSpec {
        size: 13.0,
        family: FontFamily::Sans,
        line_height: 1.25,
    };
    for (i, participant) in participants.iter().enumerate() {
        let top = PRESENCE_MARGIN + i as f64 * PRESENCE_ROW;
        let swatch = Rect::new(
            PRESENCE_MARGIN,
            top,
            PRESENCE_MARGIN + PRESENCE_SWATCH,
            top + PRESENCE_SWATCH,
        );
        surface.fill_rect(swatch, participant_color(participant));
        let origin = Point::new(swatch.x1 + 6.0, top);
        surface.fill_text(&participant.username, origin, &font, Color::BLACK);
    }
}
