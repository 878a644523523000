//! Drawing surface abstraction.

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use sketchboard_core::shapes::{FillPattern, ShapeStyle};
use sketchboard_core::text::FontSpec;

/// Hachure line angle in degrees.
pub const HACHURE_ANGLE: f64 = -41.0;

/// Per-shape drawing parameters handed to the surface.
///
/// The sketchy look (roughness, hachure) is up to the surface; a surface may
/// ignore it and draw clean geometry.
#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub stroke: Color,
    pub stroke_width: f64,
    pub roughness: f64,
    pub fill: Option<Color>,
    pub fill_style: FillPattern,
    /// Dash lengths; empty for a continuous stroke.
    pub dash: Vec<f64>,
    pub hachure_angle: f64,
    pub hachure_gap: f64,
    /// Stable per-shape seed so the sketch does not jitter between frames.
    pub seed: u32,
}

impl DrawOptions {
    pub fn from_style(style: &ShapeStyle) -> Self {
        Self {
            stroke: style.stroke(),
            stroke_width: style.stroke_width,
            roughness: style.sloppiness.roughness(),
            fill: style.fill(),
            fill_style: style.fill_pattern,
            dash: style.stroke_style.dash_pattern(style.stroke_width),
            hachure_angle: HACHURE_ANGLE,
            hachure_gap: style.stroke_width * 4.0,
            seed: style.seed,
        }
    }

    /// Clean stroke without fill, used for overlays.
    pub fn plain(stroke: Color, stroke_width: f64) -> Self {
        Self {
            stroke,
            stroke_width,
            roughness: 0.0,
            fill: None,
            fill_style: FillPattern::Solid,
            dash: Vec::new(),
            hachure_angle: HACHURE_ANGLE,
            hachure_gap: stroke_width * 4.0,
            seed: 0,
        }
    }

    /// Same options with a solid fill.
    pub fn with_solid_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self.fill_style = FillPattern::Solid;
        self
    }
}

/// A 2D drawing target.
///
/// Geometry is given in the coordinate space set by the last
/// [`Surface::set_transform`] call.
pub trait Surface {
    /// Erase everything and reset the transform.
    fn clear(&mut self, background: Color);

    fn set_transform(&mut self, transform: Affine);

    fn path(&mut self, path: &BezPath, options: &DrawOptions);

    fn ellipse(&mut self, center: Point, radii: Vec2, options: &DrawOptions);

    /// Closed polygon, stroked and optionally filled.
    fn polygon(&mut self, points: &[Point], options: &DrawOptions);

    fn line(&mut self, from: Point, to: Point, options: &DrawOptions);

    /// Polygon filled with a flat color and no stroke.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    /// One line of text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color);
}

/// A recorded surface call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    SetTransform(Affine),
    Path(BezPath, DrawOptions),
    Ellipse {
        center: Point,
        radii: Vec2,
        options: DrawOptions,
    },
    Polygon(Vec<Point>, DrawOptions),
    Line {
        from: Point,
        to: Point,
        options: DrawOptions,
    },
    FillPolygon(Vec<Point>, Color),
    FillRect(Rect, Color),
    StrokeRect(Rect, Color, f64),
    Text {
        text: String,
        origin: Point,
        font: FontSpec,
        color: Color,
    },
}

/// Surface that records every call, for tests and inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, background: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(background));
    }

    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn path(&mut self, path: &BezPath, options: &DrawOptions) {
        self.commands
            .push(DrawCommand::Path(path.clone(), options.clone()));
    }

    fn ellipse(&mut self, center: Point, radii: Vec2, options: &DrawOptions) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            options: options.clone(),
        });
    }

    fn polygon(&mut self, points: &[Point], options: &DrawOptions) {
        self.commands
            .push(DrawCommand::Polygon(points.to_vec(), options.clone()));
    }

    fn line(&mut self, from: Point, to: Point, options: &DrawOptions) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            options: options.clone(),
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands
            .push(DrawCommand::FillPolygon(points.to_vec(), color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeRect(rect, color, width));
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font: *font,
            color,
        });
    }
}
