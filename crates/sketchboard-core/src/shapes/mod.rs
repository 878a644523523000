//! Shape definitions for the drawing canvas.

mod arrow;
mod diamond;
mod ellipse;
mod line;
mod pencil;
mod rectangle;
mod text;

pub use arrow::{Arrow, ArrowHead};
pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use line::Line;
pub use pencil::Pencil;
pub use rectangle::{EdgeStyle, Rectangle};
pub use text::{FontFamily, Text};

use kurbo::Rect;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when validating style input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("Invalid color code: {0:?}")]
    InvalidColor(String),
    #[error("Invalid stroke width: {0}")]
    InvalidStrokeWidth(String),
    #[error("Invalid font size: {0}")]
    InvalidFontSize(String),
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` color code.
    ///
    /// Anything else is rejected so callers can keep their previous value.
    pub fn from_hex(code: &str) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidColor(code.to_string());
        let digits = code.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, c) in rgb.iter_mut().zip(digits.chars()) {
                    let v = channel(&c.to_string())?;
                    *slot = v * 17;
                }
                Ok(Self::new(rgb[0], rgb[1], rgb[2], 255))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                255,
            )),
            8 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Sloppiness level for the hand-drawn effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sloppiness {
    /// Clean, precise lines.
    Architect = 0,
    /// Slight hand-drawn feel.
    #[default]
    Artist = 1,
    /// Very sketchy.
    Cartoonist = 2,
}

impl Sloppiness {
    /// Roughness value handed to the sketch renderer.
    pub fn roughness(&self) -> f64 {
        match self {
            Sloppiness::Architect => 0.0,
            Sloppiness::Artist => 1.0,
            Sloppiness::Cartoonist => 2.0,
        }
    }
}

/// Fill pattern style for closed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillPattern {
    /// Parallel diagonal lines.
    #[default]
    Hachure,
    /// Solid fill color.
    Solid,
    /// Cross-hatched lines.
    CrossHatch,
    /// Zigzag pattern.
    ZigZag,
    /// Dot pattern.
    Dots,
}

/// Dash pattern for strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash lengths (on, off, ...) scaled by the stroke width.
    /// An empty pattern means a continuous stroke.
    pub fn dash_pattern(&self, stroke_width: f64) -> Vec<f64> {
        match self {
            StrokeStyle::Solid => Vec::new(),
            StrokeStyle::Dashed => vec![8.0 + stroke_width, 8.0 + stroke_width],
            StrokeStyle::Dotted => vec![1.5, 6.0 + stroke_width],
        }
    }
}

/// Style properties shared by every shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Dash pattern.
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Fill pattern style.
    #[serde(default)]
    pub fill_pattern: FillPattern,
    /// Sloppiness level for the hand-drawn effect.
    #[serde(default)]
    pub sloppiness: Sloppiness,
    /// Seed for the hand-drawn effect, stable for the life of the shape.
    #[serde(default = "generate_seed")]
    pub seed: u32,
}

/// Generate a seed for new shapes.
/// Counter + hash mixing, so it works on every platform including WASM.
pub(crate) fn generate_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32-style finalizer
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

impl ShapeStyle {
    /// Stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            stroke_style: StrokeStyle::default(),
            fill_color: None,
            fill_pattern: FillPattern::default(),
            sloppiness: Sloppiness::default(),
            seed: generate_seed(),
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Common accessors implemented by every shape payload.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Axis-aligned bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// The shape sum type. Serialized with a `kind` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Diamond(Diamond),
    Line(Line),
    Arrow(Arrow),
    Pencil(Pencil),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Diamond(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Pencil(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Diamond(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Pencil(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Diamond(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Arrow(s) => s.style(),
            Shape::Pencil(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Diamond(s) => s.style_mut(),
            Shape::Line(s) => s.style_mut(),
            Shape::Arrow(s) => s.style_mut(),
            Shape::Pencil(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
        }
    }

    /// Soft-delete flag. Deleted shapes stay in the store but are not drawn.
    pub fn is_deleted(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.is_deleted,
            Shape::Ellipse(s) => s.is_deleted,
            Shape::Diamond(s) => s.is_deleted,
            Shape::Line(s) => s.is_deleted,
            Shape::Arrow(s) => s.is_deleted,
            Shape::Pencil(s) => s.is_deleted,
            Shape::Text(s) => s.is_deleted,
        }
    }

    pub fn set_deleted(&mut self, deleted: bool) {
        match self {
            Shape::Rectangle(s) => s.is_deleted = deleted,
            Shape::Ellipse(s) => s.is_deleted = deleted,
            Shape::Diamond(s) => s.is_deleted = deleted,
            Shape::Line(s) => s.is_deleted = deleted,
            Shape::Arrow(s) => s.is_deleted = deleted,
            Shape::Pencil(s) => s.is_deleted = deleted,
            Shape::Text(s) => s.is_deleted = deleted,
        }
    }

    /// Short name of the kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Diamond(_) => "diamond",
            Shape::Line(_) => "line",
            Shape::Arrow(_) => "arrow",
            Shape::Pencil(_) => "pencil",
            Shape::Text(_) => "text",
        }
    }

    /// Get the text if this shape is a text.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable text if this shape is a text.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Bounding box of a point cloud; `Rect::ZERO` when empty.
pub(crate) fn points_bounds<'a>(points: impl IntoIterator<Item = &'a kurbo::Point>) -> Rect {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            SerializableColor::from_hex("#ff8000").unwrap(),
            SerializableColor::new(255, 128, 0, 255)
        );
        assert_eq!(
            SerializableColor::from_hex("#fff").unwrap(),
            SerializableColor::white()
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080").unwrap(),
            SerializableColor::new(0, 0, 0, 128)
        );
    }

    #[test]
    fn test_hex_rejects_malformed() {
        for bad in ["", "ff0000", "#ff00", "#gg0000", "#ff00000", "red"] {
            assert!(
                matches!(SerializableColor::from_hex(bad), Err(StyleError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_roundtrip_format() {
        let c = SerializableColor::new(18, 52, 86, 255);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(SerializableColor::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn test_seeds_differ() {
        let a = ShapeStyle::default();
        let b = ShapeStyle::default();
        assert_ne!(a.seed, b.seed);
    }

    #[test]
    fn test_kind_tag_serialization() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0));
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"kind\":\"rectangle\""));
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_soft_delete_flag() {
        let mut shape = Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        assert!(!shape.is_deleted());
        shape.set_deleted(true);
        assert!(shape.is_deleted());
    }

    #[test]
    fn test_dash_patterns() {
        assert!(StrokeStyle::Solid.dash_pattern(2.0).is_empty());
        assert_eq!(StrokeStyle::Dashed.dash_pattern(2.0), vec![10.0, 10.0]);
        assert_eq!(StrokeStyle::Dotted.dash_pattern(2.0).len(), 2);
    }
}
