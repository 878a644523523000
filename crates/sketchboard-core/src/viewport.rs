//! Pan/zoom state and screen/world coordinate mapping.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Expanding extent of the world used to simulate an infinite canvas.
/// Never used for clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl VirtualBounds {
    pub fn around_origin(half_extent: f64) -> Self {
        Self {
            min_x: -half_extent,
            min_y: -half_extent,
            max_x: half_extent,
            max_y: half_extent,
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Viewport transform: `screen = world * scale + pan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    /// Visible area in screen pixels.
    pub size: Size,
    pub bounds: VirtualBounds,
    pub min_scale: f64,
    pub max_scale: f64,
    bounds_buffer: f64,
    bounds_margin: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl Viewport {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            size: Size::new(config.viewport_width, config.viewport_height),
            bounds: VirtualBounds::around_origin(config.bounds_buffer),
            min_scale: config.min_zoom,
            max_scale: config.max_zoom,
            bounds_buffer: config.bounds_buffer,
            bounds_margin: config.bounds_margin,
        }
    }

    pub fn pan(&self) -> Vec2 {
        Vec2::new(self.pan_x, self.pan_y)
    }

    /// World-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan()) * Affine::scale(self.scale)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan_x) / self.scale, (p.y - self.pan_y) / self.scale)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.pan_x, p.y * self.scale + self.pan_y)
    }

    /// The world region currently on screen.
    pub fn visible_world(&self) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(self.size.width, self.size.height)),
        )
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.grow_bounds();
    }

    /// Zoom by `factor` keeping the world point under the anchor fixed.
    ///
    /// Returns false when clamping left the scale unchanged.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) -> bool {
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if !new_scale.is_finite() || new_scale == self.scale {
            return false;
        }

        let anchor = self.screen_to_world(Point::new(screen_x, screen_y));
        self.scale = new_scale;
        self.pan_x = screen_x - anchor.x * new_scale;
        self.pan_y = screen_y - anchor.y * new_scale;
        self.grow_bounds();
        true
    }

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
        self.grow_bounds();
    }

    /// Extend the virtual bounds on each side the visible region has come
    /// within the margin of.
    fn grow_bounds(&mut self) {
        let visible = self.visible_world();
        let margin = self.bounds_margin;
        let buffer = self.bounds_buffer;
        let b = &mut self.bounds;
        let before = *b;

        if visible.x0 - margin < b.min_x {
            b.min_x = (visible.x0 - margin).min(b.min_x) - buffer;
        }
        if visible.y0 - margin < b.min_y {
            b.min_y = (visible.y0 - margin).min(b.min_y) - buffer;
        }
        if visible.x1 + margin > b.max_x {
            b.max_x = (visible.x1 + margin).max(b.max_x) + buffer;
        }
        if visible.y1 + margin > b.max_y {
            b.max_y = (visible.y1 + margin).max(b.max_y) + buffer;
        }

        if *b != before {
            log::debug!("Virtual bounds grown to {:?}", b);
        }
    }

    /// Back to scale 1 with the world origin at the top-left.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Center `bounds` in the viewport and scale it to fit inside `padding`.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let available = Size::new(
            (self.size.width - padding * 2.0).max(1.0),
            (self.size.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / bounds.width();
        let scale_y = available.height / bounds.height();
        self.scale = scale_x.min(scale_y).clamp(self.min_scale, self.max_scale);

        let center = bounds.center();
        self.pan_x = self.size.width / 2.0 - center.x * self.scale;
        self.pan_y = self.size.height / 2.0 - center.y * self.scale;
        self.grow_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.pan(), Vec2::ZERO);
        assert!(approx(viewport.scale, 1.0));
        assert!(approx(viewport.bounds.min_x, -5000.0));
    }

    #[test]
    fn test_screen_to_world_with_pan_and_zoom() {
        let mut viewport = Viewport::default();
        viewport.pan_x = 50.0;
        viewport.pan_y = 100.0;
        viewport.scale = 2.0;
        let world = viewport.screen_to_world(Point::new(150.0, 300.0));
        assert!(approx(world.x, 50.0));
        assert!(approx(world.y, 100.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::default();
        viewport.pan_x = 30.0;
        viewport.pan_y = -20.0;
        viewport.scale = 1.5;

        for (x, y) in [(123.0, 456.0), (0.0, 0.0), (-75.5, 1e4)] {
            let original = Point::new(x, y);
            let back = viewport.world_to_screen(viewport.screen_to_world(original));
            assert!((back.x - original.x).abs() < 1e-9);
            assert!((back.y - original.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_transform_matches_mapping() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(10.0, 20.0, 3.0);
        viewport.pan_by(7.0, -3.0);
        let p = Point::new(42.0, -8.0);
        let a = viewport.transform() * p;
        let b = viewport.world_to_screen(p);
        assert!(approx(a.x, b.x) && approx(a.y, b.y));
    }

    #[test]
    fn test_zoom_at_anchor() {
        let mut viewport = Viewport::default();
        assert!(viewport.zoom_at(400.0, 300.0, 1.1));
        assert!(approx(viewport.scale, 1.1));
        assert!(approx(viewport.pan_x, -40.0));
        assert!(approx(viewport.pan_y, -30.0));
    }

    #[test]
    fn test_zoom_keeps_world_point_fixed() {
        let mut viewport = Viewport::default();
        viewport.pan_by(-130.0, 55.0);
        viewport.zoom_at(0.0, 0.0, 1.7);

        let anchor = Point::new(612.0, 97.0);
        let before = viewport.screen_to_world(anchor);
        for factor in [0.5, 1.25, 3.0, 0.9] {
            viewport.zoom_at(anchor.x, anchor.y, factor);
            let after = viewport.screen_to_world(anchor);
            assert!((after.x - before.x).abs() < 1e-9);
            assert!((after.y - before.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::default();
        for factor in [0.001, 0.5, 1000.0, 7.0, 1e-9, 2.0] {
            viewport.zoom_at(100.0, 100.0, factor);
            assert!(viewport.scale >= viewport.min_scale);
            assert!(viewport.scale <= viewport.max_scale);
        }
        viewport.zoom_at(0.0, 0.0, 1e6);
        assert!(approx(viewport.scale, viewport.max_scale));
        // Already at the limit: nothing changes.
        let pan = viewport.pan();
        assert!(!viewport.zoom_at(50.0, 50.0, 2.0));
        assert_eq!(viewport.pan(), pan);
    }

    #[test]
    fn test_pan_grows_bounds() {
        let mut viewport = Viewport::default();
        let before = viewport.bounds;
        // Small pans stay inside the margin.
        viewport.pan_by(-10.0, 0.0);
        assert_eq!(viewport.bounds, before);

        // Scroll right until the visible region nears max_x.
        viewport.pan_by(-3500.0, 0.0);
        assert!(viewport.bounds.max_x > before.max_x);
        assert!(approx(viewport.bounds.min_x, before.min_x));
        let visible = viewport.visible_world();
        assert!(visible.x1 + 1000.0 <= viewport.bounds.max_x);
    }

    #[test]
    fn test_pan_far_away_covers_view() {
        let mut viewport = Viewport::default();
        viewport.pan_by(1e6, 1e6);
        let visible = viewport.visible_world();
        let bounds = viewport.bounds.to_rect();
        assert!(bounds.x0 <= visible.x0 && bounds.y0 <= visible.y0);
        assert!(bounds.x1 >= visible.x1 && bounds.y1 >= visible.y1);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut viewport = Viewport::default();
        viewport.set_size(Size::new(1000.0, 1000.0));
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 400.0, 200.0), 100.0);
        assert!(approx(viewport.scale, 2.0));
        let center = viewport.world_to_screen(Point::new(200.0, 100.0));
        assert!(approx(center.x, 500.0) && approx(center.y, 500.0));
    }
}
