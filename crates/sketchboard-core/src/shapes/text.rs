//! Text shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use crate::text::{FontSpec, TextMeasurer, measure_text};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Hand-drawn style font (default).
    #[default]
    Handwritten,
    /// Clean sans-serif font.
    Sans,
    /// Fixed-width font.
    Monospace,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Handwritten => "Virgil, Segoe Print, cursive",
            FontFamily::Sans => "Helvetica, Arial, sans-serif",
            FontFamily::Monospace => "Cascadia, Consolas, monospace",
        }
    }

    /// Average glyph advance as a fraction of the font size.
    /// Empirical values, used when no real font metrics are available.
    pub fn char_width_factor(&self) -> f64 {
        match self {
            FontFamily::Handwritten => 0.55,
            FontFamily::Sans => 0.52,
            FontFamily::Monospace => 0.60,
        }
    }
}

/// A text shape.
///
/// `x`/`y` is where the text was placed. The box `start_*`..`end_*` is derived
/// from measured metrics by [`Text::relayout`] and must not be edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    /// The text content. Lines are separated by `\n`.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_family: FontFamily,
    pub color: SerializableColor,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub style: ShapeStyle,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    /// Default line height multiplier.
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.25;

    /// Create a new text shape anchored at `position`.
    ///
    /// The derived box is empty until the first [`Text::relayout`].
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            start_x: position.x,
            start_y: position.y,
            end_x: position.x,
            end_y: position.y,
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: FontFamily::default(),
            color: SerializableColor::black(),
            line_height: Self::DEFAULT_LINE_HEIGHT,
            style: ShapeStyle::default(),
            is_deleted: false,
        }
    }

    /// Anchor position (top-left of the text box).
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Font parameters for measurement.
    pub fn font(&self) -> FontSpec {
        FontSpec {
            size: self.font_size,
            family: self.font_family,
            line_height: self.line_height,
        }
    }

    /// Number of characters in the content.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Recompute the derived box from fresh metrics.
    pub fn relayout(&mut self, measurer: &dyn TextMeasurer) {
        let metrics = measure_text(measurer, &self.text, self.font());
        self.start_x = self.x;
        self.start_y = self.y;
        self.end_x = self.x + metrics.width;
        self.end_y = self.y + metrics.height;
    }

    /// Pixel distance between baselines of consecutive lines.
    pub fn line_height_px(&self) -> f64 {
        self.font().line_height_px()
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.start_x, self.start_y, self.end_x, self.end_y)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
