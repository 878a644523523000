//! Fuses wheel, trackpad and multi-touch input into viewport pan/zoom.

use crate::config::CanvasConfig;
use crate::input::{DeltaMode, TouchEvent, TouchPhase, WheelEvent};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use std::collections::BTreeMap;

/// How a wheel event was interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelGesture {
    /// Trackpad pinch (modifier + fractional delta).
    Pinch { factor: f64 },
    /// Two-finger trackpad scroll (fractional delta, no modifier).
    Pan { dx: f64, dy: f64 },
    /// Notched mouse wheel.
    Step { factor: f64 },
    Ignored,
}

/// Two-finger frame: centroid and distance of the two lowest-id touches.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchFrame {
    centroid: Point,
    distance: f64,
}

/// Single-finger pan reference.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanAnchor {
    touch: Point,
    pan: Vec2,
}

/// Gesture state. One per canvas.
#[derive(Debug, Clone)]
pub struct GestureFusion {
    touches: BTreeMap<u64, Point>,
    pinch: Option<PinchFrame>,
    pan_anchor: Option<PanAnchor>,
    wheel_zoom_step: f64,
    pinch_sensitivity: f64,
    touch_damping: f64,
}

impl Default for GestureFusion {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl GestureFusion {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            touches: BTreeMap::new(),
            pinch: None,
            pan_anchor: None,
            wheel_zoom_step: config.wheel_zoom_step,
            pinch_sensitivity: config.pinch_sensitivity,
            touch_damping: config.touch_damping,
        }
    }

    /// Number of fingers currently down.
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Classify a wheel event without applying it.
    pub fn classify_wheel(&self, event: &WheelEvent) -> WheelGesture {
        let delta = event.delta;
        let fractional = event.mode == DeltaMode::Pixel
            && (delta.x.fract() != 0.0 || delta.y.fract() != 0.0);

        if fractional && event.modifiers.command() {
            let factor = (1.0 - delta.y * self.pinch_sensitivity).max(f64::MIN_POSITIVE);
            WheelGesture::Pinch { factor }
        } else if fractional {
            WheelGesture::Pan {
                dx: -delta.x,
                dy: -delta.y,
            }
        } else if delta.y < 0.0 {
            WheelGesture::Step {
                factor: self.wheel_zoom_step,
            }
        } else if delta.y > 0.0 {
            WheelGesture::Step {
                factor: 1.0 / self.wheel_zoom_step,
            }
        } else {
            WheelGesture::Ignored
        }
    }

    /// Classify and apply a wheel event.
    pub fn handle_wheel(&mut self, viewport: &mut Viewport, event: &WheelEvent) -> WheelGesture {
        let gesture = self.classify_wheel(event);
        let at = event.position;
        match gesture {
            WheelGesture::Pinch { factor } | WheelGesture::Step { factor } => {
                viewport.zoom_at(at.x, at.y, factor);
            }
            WheelGesture::Pan { dx, dy } => viewport.pan_by(dx, dy),
            WheelGesture::Ignored => {}
        }
        gesture
    }

    /// Apply a touch event. Returns true if the viewport may have changed.
    pub fn handle_touch(&mut self, viewport: &mut Viewport, event: &TouchEvent) -> bool {
        match event.phase {
            TouchPhase::Start => {
                for touch in &event.touches {
                    self.touches.insert(touch.id, touch.position);
                }
                self.recapture(viewport);
                false
            }
            TouchPhase::Move => {
                for touch in &event.touches {
                    if let Some(position) = self.touches.get_mut(&touch.id) {
                        *position = touch.position;
                    }
                }
                self.apply_move(viewport)
            }
            TouchPhase::End | TouchPhase::Cancel => {
                for touch in &event.touches {
                    self.touches.remove(&touch.id);
                }
                self.recapture(viewport);
                false
            }
        }
    }

    fn pinch_frame(&self) -> Option<PinchFrame> {
        let mut lowest = self.touches.values();
        let a = *lowest.next()?;
        let b = *lowest.next()?;
        Some(PinchFrame {
            centroid: a.midpoint(b),
            distance: a.distance(b),
        })
    }

    /// Reset gesture references after the finger count changed.
    fn recapture(&mut self, viewport: &Viewport) {
        self.pinch = self.pinch_frame();
        self.pan_anchor = match (self.touches.len(), self.touches.values().next()) {
            (1, Some(&touch)) => Some(PanAnchor {
                touch,
                pan: viewport.pan(),
            }),
            _ => None,
        };
    }

    fn apply_move(&mut self, viewport: &mut Viewport) -> bool {
        if let Some(frame) = self.pinch_frame() {
            if let Some(previous) = self.pinch {
                if previous.distance > f64::EPSILON {
                    let ratio = frame.distance / previous.distance;
                    let factor = 1.0 + (ratio - 1.0) * self.touch_damping;
                    viewport.zoom_at(frame.centroid.x, frame.centroid.y, factor);
                }
                let shift = frame.centroid - previous.centroid;
                viewport.pan_by(shift.x, shift.y);
            }
            self.pinch = Some(frame);
            return true;
        }

        let (Some(anchor), Some(&touch)) = (self.pan_anchor, self.touches.values().next()) else {
            return false;
        };
        let target = anchor.pan + (touch - anchor.touch);
        let step = target - viewport.pan();
        viewport.pan_by(step.x, step.y);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, TouchPoint};

    fn wheel(dx: f64, dy: f64, mode: DeltaMode, modifiers: Modifiers) -> WheelEvent {
        WheelEvent {
            position: Point::new(200.0, 100.0),
            delta: Vec2::new(dx, dy),
            mode,
            modifiers,
        }
    }

    fn touch(phase: TouchPhase, points: &[(u64, f64, f64)]) -> TouchEvent {
        TouchEvent {
            phase,
            touches: points
                .iter()
                .map(|&(id, x, y)| TouchPoint {
                    id,
                    position: Point::new(x, y),
                })
                .collect(),
        }
    }

    #[test]
    fn test_wheel_classification() {
        let fusion = GestureFusion::default();
        assert!(matches!(
            fusion.classify_wheel(&wheel(0.0, 2.5, DeltaMode::Pixel, Modifiers::CTRL)),
            WheelGesture::Pinch { .. }
        ));
        assert_eq!(
            fusion.classify_wheel(&wheel(1.5, -4.25, DeltaMode::Pixel, Modifiers::NONE)),
            WheelGesture::Pan { dx: -1.5, dy: 4.25 }
        );
        assert_eq!(
            fusion.classify_wheel(&wheel(0.0, -100.0, DeltaMode::Pixel, Modifiers::NONE)),
            WheelGesture::Step { factor: 1.1 }
        );
        // Line mode is always a notched wheel, even with fractions.
        assert!(matches!(
            fusion.classify_wheel(&wheel(0.0, 0.5, DeltaMode::Line, Modifiers::CTRL)),
            WheelGesture::Step { factor } if factor < 1.0
        ));
        assert_eq!(
            fusion.classify_wheel(&wheel(0.0, 0.0, DeltaMode::Pixel, Modifiers::NONE)),
            WheelGesture::Ignored
        );
    }

    #[test]
    fn test_step_zoom_anchored_at_pointer() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        let event = wheel(0.0, -3.0, DeltaMode::Line, Modifiers::NONE);
        let before = viewport.screen_to_world(event.position);
        fusion.handle_wheel(&mut viewport, &event);
        assert!((viewport.scale - 1.1).abs() < 1e-9);
        let after = viewport.screen_to_world(event.position);
        assert!((after - before).hypot() < 1e-9);
    }

    #[test]
    fn test_pinch_zoom_in() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        fusion.handle_wheel(
            &mut viewport,
            &wheel(0.0, -10.5, DeltaMode::Pixel, Modifiers::CTRL),
        );
        assert!((viewport.scale - 1.105).abs() < 1e-9);
    }

    #[test]
    fn test_two_finger_pan() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        fusion.handle_wheel(
            &mut viewport,
            &wheel(3.5, -2.5, DeltaMode::Pixel, Modifiers::NONE),
        );
        assert_eq!(viewport.pan(), Vec2::new(-3.5, 2.5));
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_touch_pans_from_reference() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        viewport.pan_by(10.0, 10.0);

        fusion.handle_touch(&mut viewport, &touch(TouchPhase::Start, &[(1, 100.0, 100.0)]));
        fusion.handle_touch(&mut viewport, &touch(TouchPhase::Move, &[(1, 130.0, 90.0)]));
        fusion.handle_touch(&mut viewport, &touch(TouchPhase::Move, &[(1, 150.0, 80.0)]));
        assert_eq!(viewport.pan(), Vec2::new(60.0, -10.0));
    }

    #[test]
    fn test_pinch_spread_zooms_damped() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        fusion.handle_touch(
            &mut viewport,
            &touch(TouchPhase::Start, &[(1, 100.0, 100.0), (2, 200.0, 100.0)]),
        );
        assert_eq!(fusion.active_touches(), 2);

        // Distance doubles around a fixed centroid.
        fusion.handle_touch(
            &mut viewport,
            &touch(TouchPhase::Move, &[(1, 50.0, 100.0), (2, 250.0, 100.0)]),
        );
        assert!((viewport.scale - 1.3).abs() < 1e-9);

        // The centroid stays over the same world point.
        let centroid = Point::new(150.0, 100.0);
        let world = viewport.screen_to_world(centroid);
        assert!((world.x - 150.0).abs() < 1e-9);
        assert!((world.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_centroid_drag_pans() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        fusion.handle_touch(
            &mut viewport,
            &touch(TouchPhase::Start, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]),
        );
        fusion.handle_touch(
            &mut viewport,
            &touch(TouchPhase::Move, &[(1, 20.0, 30.0), (2, 120.0, 30.0)]),
        );
        assert!((viewport.scale - 1.0).abs() < 1e-12);
        assert!((viewport.pan_x - 20.0).abs() < 1e-9);
        assert!((viewport.pan_y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_lifting_finger_recaptures_reference() {
        let mut fusion = GestureFusion::default();
        let mut viewport = Viewport::default();
        fusion.handle_touch(
            &mut viewport,
            &touch(TouchPhase::Start, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]),
        );
        fusion.handle_touch(&mut viewport, &touch(TouchPhase::End, &[(1, 0.0, 0.0)]));
        assert_eq!(fusion.active_touches(), 1);

        // The remaining finger pans relative to where it was when the count changed.
        fusion.handle_touch(&mut viewport, &touch(TouchPhase::Move, &[(2, 110.0, 5.0)]));
        assert_eq!(viewport.pan(), Vec2::new(10.0, 5.0));

        fusion.handle_touch(&mut viewport, &touch(TouchPhase::Cancel, &[(2, 110.0, 5.0)]));
        assert_eq!(fusion.active_touches(), 0);
        assert!(!fusion.handle_touch(&mut viewport, &touch(TouchPhase::Move, &[(2, 0.0, 0.0)])));
    }
}
