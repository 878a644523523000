//! Text metrics and index/coordinate mapping.
//!
//! All indices are character offsets into the whole string, with each `\n`
//! counting as one character.

use crate::shapes::FontFamily;
use kurbo::Point;

/// Font-metrics query.
pub trait TextMeasurer {
    /// Advance width of a single line of text in pixels.
    fn line_width(&self, line: &str, font: &FontSpec) -> f64;
}

/// Measures with a per-family average glyph advance. Used when no font
/// backend is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn line_width(&self, line: &str, font: &FontSpec) -> f64 {
        line.chars().count() as f64 * font.size * font.family.char_width_factor()
    }
}

/// Font parameters a measurement depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub family: FontFamily,
    /// Multiplier applied to the font size.
    pub line_height: f64,
}

impl FontSpec {
    pub fn line_height_px(&self) -> f64 {
        self.size * self.line_height
    }
}

/// Result of [`measure_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextMetrics {
    pub line_widths: Vec<f64>,
    pub line_height: f64,
    /// Widest line.
    pub width: f64,
    /// Line count times line height.
    pub height: f64,
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}

/// Prefix of `line` holding its first `col` characters.
fn char_prefix(line: &str, col: usize) -> &str {
    match line.char_indices().nth(col) {
        Some((byte, _)) => &line[..byte],
        None => line,
    }
}

pub fn measure_text(measurer: &dyn TextMeasurer, text: &str, font: FontSpec) -> TextMetrics {
    let line_widths: Vec<f64> = lines(text)
        .map(|line| measurer.line_width(line, &font))
        .collect();
    let line_height = font.line_height_px();
    let width = line_widths.iter().copied().fold(0.0, f64::max);
    let height = line_widths.len() as f64 * line_height;
    TextMetrics {
        line_widths,
        line_height,
        width,
        height,
    }
}

/// Split a flat index into (line, column). Out-of-range indices clamp to the end.
pub fn index_to_line_col(text: &str, index: usize) -> (usize, usize) {
    let mut consumed = 0;
    let mut last = (0, 0);
    for (line_index, line) in lines(text).enumerate() {
        let len = line.chars().count();
        if index <= consumed + len {
            return (line_index, index - consumed);
        }
        consumed += len + 1;
        last = (line_index, len);
    }
    last
}

/// Flatten (line, column) into an index. The column is clamped to the line length
/// and the line to the last line.
pub fn line_col_to_index(text: &str, line: usize, col: usize) -> usize {
    let mut index = 0;
    let mut all = lines(text).peekable();
    let mut current = 0;
    while let Some(content) = all.next() {
        let len = content.chars().count();
        if current == line || all.peek().is_none() {
            return index + col.min(len);
        }
        index += len + 1;
        current += 1;
    }
    index
}

/// Map a point to the character index under it.
///
/// `origin` is the top-left of the text box.
pub fn coordinate_to_index(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: FontSpec,
    origin: Point,
    point: Point,
) -> usize {
    let all: Vec<&str> = lines(text).collect();
    let line_height = font.line_height_px();
    let rel_y = point.y - origin.y;
    let line_index = if line_height > 0.0 && rel_y > 0.0 {
        ((rel_y / line_height).floor() as usize).min(all.len() - 1)
    } else {
        0
    };

    let line = all[line_index];
    let rel_x = point.x - origin.x;
    let len = line.chars().count();
    let col = (1..=len)
        .find(|&n| measurer.line_width(char_prefix(line, n), &font) > rel_x)
        .map(|n| n - 1)
        .unwrap_or(len);

    all[..line_index]
        .iter()
        .map(|l| l.chars().count() + 1)
        .sum::<usize>()
        + col
}

/// Map a character index to the top-left of its caret position.
pub fn index_to_coordinate(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: FontSpec,
    origin: Point,
    index: usize,
) -> Point {
    let (line_index, col) = index_to_line_col(text, index);
    let line = lines(text).nth(line_index).unwrap_or_default();
    Point::new(
        origin.x + measurer.line_width(char_prefix(line, col), &font),
        origin.y + line_index as f64 * font.line_height_px(),
    )
}
