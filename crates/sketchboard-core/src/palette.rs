//! Current drawing style, read when shapes are created.

use crate::shapes::{
    ArrowHead, EdgeStyle, FillPattern, FontFamily, SerializableColor, Shape, ShapeStyle,
    Sloppiness, StrokeStyle, StyleError, Text,
};
use serde::{Deserialize, Serialize};

/// Style values new shapes are instantiated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    pub stroke_color: SerializableColor,
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub fill_pattern: FillPattern,
    pub sloppiness: Sloppiness,
    pub edge: EdgeStyle,
    pub arrow_head: ArrowHead,
    pub font_family: FontFamily,
    pub font_size: f64,
    pub line_height: f64,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: None,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::default(),
            fill_pattern: FillPattern::default(),
            sloppiness: Sloppiness::default(),
            edge: EdgeStyle::default(),
            arrow_head: ArrowHead::default(),
            font_family: FontFamily::default(),
            font_size: Text::DEFAULT_FONT_SIZE,
            line_height: Text::DEFAULT_LINE_HEIGHT,
        }
    }
}

impl StylePalette {
    /// A fresh shape style with its own render seed.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            stroke_style: self.stroke_style,
            fill_color: self.fill_color,
            fill_pattern: self.fill_pattern,
            sloppiness: self.sloppiness,
            ..ShapeStyle::default()
        }
    }

    /// Style a freshly created shape. Kind-specific values (edge, head, font)
    /// are copied too.
    pub fn style_new_shape(&self, shape: &mut Shape) {
        *shape.style_mut() = self.shape_style();
        match shape {
            Shape::Rectangle(r) => r.edge = self.edge,
            Shape::Arrow(a) => a.head = self.arrow_head,
            Shape::Text(t) => {
                t.font_family = self.font_family;
                t.font_size = self.font_size;
                t.line_height = self.line_height;
                t.color = self.stroke_color;
            }
            Shape::Ellipse(_) | Shape::Diamond(_) | Shape::Line(_) | Shape::Pencil(_) => {}
        }
    }
}

/// One edit made through the style UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum StyleChange {
    StrokeColor(SerializableColor),
    FillColor(Option<SerializableColor>),
    StrokeWidth(f64),
    StrokeStyle(StrokeStyle),
    FillPattern(FillPattern),
    Sloppiness(Sloppiness),
    Edge(EdgeStyle),
    ArrowHead(ArrowHead),
    FontFamily(FontFamily),
    FontSize(f64),
}

impl StyleChange {
    /// Parse a stroke color code.
    pub fn stroke_color_hex(code: &str) -> Result<Self, StyleError> {
        SerializableColor::from_hex(code).map(StyleChange::StrokeColor)
    }

    /// Parse a fill color code. An empty code removes the fill.
    pub fn fill_color_hex(code: &str) -> Result<Self, StyleError> {
        if code.trim().is_empty() {
            return Ok(StyleChange::FillColor(None));
        }
        SerializableColor::from_hex(code).map(|c| StyleChange::FillColor(Some(c)))
    }

    /// Reject values that would corrupt a shape.
    pub fn validate(&self) -> Result<(), StyleError> {
        match *self {
            StyleChange::StrokeWidth(w) if !(w.is_finite() && w > 0.0) => {
                Err(StyleError::InvalidStrokeWidth(w.to_string()))
            }
            StyleChange::FontSize(s) if !(s.is_finite() && s > 0.0) => {
                Err(StyleError::InvalidFontSize(s.to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn apply_to_palette(&self, palette: &mut StylePalette) {
        match *self {
            StyleChange::StrokeColor(c) => palette.stroke_color = c,
            StyleChange::FillColor(c) => palette.fill_color = c,
            StyleChange::StrokeWidth(w) => palette.stroke_width = w,
            StyleChange::StrokeStyle(s) => palette.stroke_style = s,
            StyleChange::FillPattern(p) => palette.fill_pattern = p,
            StyleChange::Sloppiness(s) => palette.sloppiness = s,
            StyleChange::Edge(e) => palette.edge = e,
            StyleChange::ArrowHead(h) => palette.arrow_head = h,
            StyleChange::FontFamily(f) => palette.font_family = f,
            StyleChange::FontSize(s) => palette.font_size = s,
        }
    }

    /// Restyle an existing shape. Properties that do not apply to the kind
    /// are ignored.
    ///
    /// Returns true if the change affects text layout.
    pub fn apply_to_shape(&self, shape: &mut Shape) -> bool {
        match (*self, shape) {
            (StyleChange::StrokeColor(c), Shape::Text(t)) => {
                t.color = c;
                t.style.stroke_color = c;
                false
            }
            (StyleChange::FontFamily(f), Shape::Text(t)) => {
                t.font_family = f;
                true
            }
            (StyleChange::FontSize(s), Shape::Text(t)) => {
                t.font_size = s;
                true
            }
            (StyleChange::Edge(e), Shape::Rectangle(r)) => {
                r.edge = e;
                false
            }
            (StyleChange::ArrowHead(h), Shape::Arrow(a)) => {
                a.head = h;
                false
            }
            (StyleChange::StrokeColor(c), shape) => {
                shape.style_mut().stroke_color = c;
                false
            }
            (StyleChange::FillColor(c), shape) => {
                shape.style_mut().fill_color = c;
                false
            }
            (StyleChange::StrokeWidth(w), shape) => {
                shape.style_mut().stroke_width = w;
                false
            }
            (StyleChange::StrokeStyle(s), shape) => {
                shape.style_mut().stroke_style = s;
                false
            }
            (StyleChange::FillPattern(p), shape) => {
                shape.style_mut().fill_pattern = p;
                false
            }
            (StyleChange::Sloppiness(s), shape) => {
                shape.style_mut().sloppiness = s;
                false
            }
            _ => false,
        }
    }
}
