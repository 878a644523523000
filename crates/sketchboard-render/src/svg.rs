//! SVG document export.

use crate::RenderResult;
use crate::surface::{DrawOptions, Surface};
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use peniko::Color;
use sketchboard_core::shapes::FillPattern;
use sketchboard_core::text::FontSpec;
use std::path::Path;

/// Surface that writes clean SVG elements. Roughness and hachure are not
/// reproduced; hatched fills are drawn as translucent solid fills.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: Size,
    transform: Affine,
    body: String,
}

fn svg_color(color: Color) -> String {
    let c = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn opacity(color: Color) -> f64 {
    f64::from(color.to_rgba8().a) / 255.0
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: Affine::IDENTITY,
            body: String::new(),
        }
    }

    fn transform_attr(&self) -> String {
        if self.transform == Affine::IDENTITY {
            return String::new();
        }
        let [a, b, c, d, e, f] = self.transform.as_coeffs();
        format!(" transform=\"matrix({a} {b} {c} {d} {e} {f})\"")
    }

    fn paint_attrs(options: &DrawOptions) -> String {
        let mut attrs = format!(
            " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
            svg_color(options.stroke),
            options.stroke_width
        );
        let stroke_opacity = opacity(options.stroke);
        if stroke_opacity < 1.0 {
            attrs.push_str(&format!(" stroke-opacity=\"{stroke_opacity}\""));
        }
        if !options.dash.is_empty() {
            let dash: Vec<String> = options.dash.iter().map(f64::to_string).collect();
            attrs.push_str(&format!(" stroke-dasharray=\"{}\"", dash.join(" ")));
        }
        match options.fill {
            Some(fill) => {
                let mut fill_opacity = opacity(fill);
                if options.fill_style != FillPattern::Solid {
                    fill_opacity *= 0.5;
                }
                attrs.push_str(&format!(" fill=\"{}\"", svg_color(fill)));
                if fill_opacity < 1.0 {
                    attrs.push_str(&format!(" fill-opacity=\"{fill_opacity}\""));
                }
            }
            None => attrs.push_str(" fill=\"none\""),
        }
        attrs
    }

    fn flat_fill_attrs(color: Color) -> String {
        let mut attrs = format!(" fill=\"{}\" stroke=\"none\"", svg_color(color));
        let fill_opacity = opacity(color);
        if fill_opacity < 1.0 {
            attrs.push_str(&format!(" fill-opacity=\"{fill_opacity}\""));
        }
        attrs
    }

    fn element(&mut self, tag: &str, geometry: String, paint: String) {
        let transform = self.transform_attr();
        self.body
            .push_str(&format!("  <{tag} {geometry}{paint}{transform}/>\n"));
    }

    /// The finished document.
    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.size.width,
            h = self.size.height,
            body = self.body
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.finish())?;
        log::info!("Wrote SVG to {}", path.display());
        Ok(())
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, background: Color) {
        self.body.clear();
        self.transform = Affine::IDENTITY;
        let geometry = format!("x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"", self.size.width, self.size.height);
        self.element("rect", geometry, Self::flat_fill_attrs(background));
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn path(&mut self, path: &BezPath, options: &DrawOptions) {
        self.element(
            "path",
            format!("d=\"{}\"", path.to_svg()),
            Self::paint_attrs(options),
        );
    }

    fn ellipse(&mut self, center: Point, radii: Vec2, options: &DrawOptions) {
        self.element(
            "ellipse",
            format!(
                "cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                center.x,
                center.y,
                radii.x.abs(),
                radii.y.abs()
            ),
            Self::paint_attrs(options),
        );
    }

    fn polygon(&mut self, points: &[Point], options: &DrawOptions) {
        self.element(
            "polygon",
            format!("points=\"{}\"", points_attr(points)),
            Self::paint_attrs(options),
        );
    }

    fn line(&mut self, from: Point, to: Point, options: &DrawOptions) {
        self.element(
            "line",
            format!(
                "x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                from.x, from.y, to.x, to.y
            ),
            Self::paint_attrs(options),
        );
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.element(
            "polygon",
            format!("points=\"{}\"", points_attr(points)),
            Self::flat_fill_attrs(color),
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.abs();
        self.element(
            "rect",
            format!(
                "x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height()
            ),
            Self::flat_fill_attrs(color),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        let rect = rect.abs();
        self.element(
            "rect",
            format!(
                "x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height()
            ),
            format!(
                " fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"",
                svg_color(color)
            ),
        );
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color) {
        let transform = self.transform_attr();
        self.body.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" dominant-baseline=\"text-before-edge\" xml:space=\"preserve\"{}{transform}>{}</text>\n",
            origin.x,
            origin.y,
            font.family.name(),
            font.size,
            Self::flat_fill_attrs(color),
            escape(text)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_core::shapes::FontFamily;

    #[test]
    fn test_empty_document() {
        let mut svg = SvgSurface::new(Size::new(100.0, 50.0));
        svg.clear(Color::WHITE);
        let doc = svg.finish();
        assert!(doc.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"50\""));
        assert!(doc.contains("fill=\"#ffffff\""));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_transform_and_dash() {
        let mut svg = SvgSurface::new(Size::new(10.0, 10.0));
        svg.set_transform(Affine::translate((5.0, 6.0)));
        let mut options = DrawOptions::plain(Color::BLACK, 2.0);
        options.dash = vec![10.0, 10.0];
        svg.line(Point::ZERO, Point::new(1.0, 1.0), &options);
        let doc = svg.finish();
        assert!(doc.contains("transform=\"matrix(1 0 0 1 5 6)\""));
        assert!(doc.contains("stroke-dasharray=\"10 10\""));
        assert!(doc.contains("fill=\"none\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut svg = SvgSurface::new(Size::new(10.0, 10.0));
        let font = FontSpec {
            size: 20.0,
            family: FontFamily::Sans,
            line_height: 1.25,
        };
        svg.fill_text("a < b & c", Point::ZERO, &font, Color::BLACK);
        let doc = svg.finish();
        assert!(doc.contains(">a &lt; b &amp; c</text>"));
        assert!(doc.contains(&format!("font-family=\"{}\"", FontFamily::Sans.name())));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let mut svg = SvgSurface::new(Size::new(10.0, 10.0));
        svg.clear(Color::WHITE);
        svg.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, svg.finish());
    }
}
