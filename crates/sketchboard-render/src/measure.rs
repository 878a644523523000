//! Text measurement with real font metrics.

use parley::layout::PositionedLayoutItem;
use parley::{FontContext, FontStack, Layout, LayoutContext, StyleProperty};
use peniko::Brush;
use sketchboard_core::text::{ApproximateMeasurer, FontSpec, TextMeasurer};
use std::cell::RefCell;
use std::fmt;

struct Contexts {
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

/// Measures lines by laying them out with Parley against the system fonts.
///
/// The font stack is the same CSS family list the SVG export writes, so
/// measured widths follow the glyphs a viewer draws. When no font resolves
/// a line, the per-family estimate of [`ApproximateMeasurer`] is used.
pub struct ParleyMeasurer {
    contexts: RefCell<Contexts>,
    fallback: ApproximateMeasurer,
}

impl fmt::Debug for ParleyMeasurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParleyMeasurer").finish_non_exhaustive()
    }
}

impl Default for ParleyMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyMeasurer {
    pub fn new() -> Self {
        Self {
            contexts: RefCell::new(Contexts {
                font_cx: FontContext::new(),
                layout_cx: LayoutContext::new(),
            }),
            fallback: ApproximateMeasurer,
        }
    }

    fn layout(&self, line: &str, font: &FontSpec) -> Layout<Brush> {
        let mut guard = self.contexts.borrow_mut();
        let Contexts { font_cx, layout_cx } = &mut *guard;
        let mut builder = layout_cx.ranged_builder(font_cx, line, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font.size as f32));
        builder.push_default(StyleProperty::FontStack(FontStack::Source(
            font.family.name().into(),
        )));
        let mut layout = builder.build(line);
        layout.break_all_lines(None);
        layout
    }

    /// Whether the layout produced any glyph at all.
    fn has_glyphs(layout: &Layout<Brush>) -> bool {
        layout.lines().any(|line| {
            line.items().any(|item| match item {
                PositionedLayoutItem::GlyphRun(run) => run.glyphs().next().is_some(),
                _ => false,
            })
        })
    }

    /// Whether a system font resolves for `font`.
    pub fn resolves(&self, font: &FontSpec) -> bool {
        Self::has_glyphs(&self.layout("M", font))
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn line_width(&self, line: &str, font: &FontSpec) -> f64 {
        if line.is_empty() {
            return 0.0;
        }
        let layout = self.layout(line, font);
        if !Self::has_glyphs(&layout) {
            log::debug!("No font for {:?}, estimating width", font.family);
            return self.fallback.line_width(line, font);
        }
        f64::from(layout.full_width())
    }
}
