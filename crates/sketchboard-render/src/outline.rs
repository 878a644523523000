//! Variable-width outline of a freehand stroke.
//!
//! Turns pencil samples into a closed polygon that is filled instead of
//! stroked. Width follows a simulated pressure: fast segments get thinner.

use kurbo::{Point, Vec2};
use std::f64::consts::PI;

/// How quickly simulated pressure follows speed changes.
const PRESSURE_RATE: f64 = 0.275;
/// Segments per round cap.
const CAP_SEGMENTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineOptions {
    /// Nominal stroke diameter.
    pub size: f64,
    /// How much pressure changes the width, 0 (none) to 1.
    pub thinning: f64,
    /// Minimum spacing between outline points, as a fraction of `size`.
    pub smoothing: f64,
    /// How far each sample is pulled toward the previous one, 0 to 1.
    pub streamline: f64,
}

impl OutlineOptions {
    /// Parameters used for pencil strokes of the given width.
    pub fn for_stroke_width(stroke_width: f64) -> Self {
        Self {
            size: stroke_width * 5.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }

    fn radius(&self, pressure: f64) -> f64 {
        (self.size * (0.5 - self.thinning * (0.5 - pressure))).max(f64::EPSILON)
    }
}

/// Outline polygon for `points`. Fewer than two points yield an empty outline.
pub fn stroke_outline(points: &[Point], options: &OutlineOptions) -> Vec<Point> {
    if points.len() < 2 {
        return Vec::new();
    }

    let samples = streamline(points, options.streamline);
    let radii = pressure_radii(&samples, options);
    let min_spacing = options.size * options.smoothing * 0.5;

    let mut left: Vec<Point> = Vec::with_capacity(samples.len());
    let mut right: Vec<Point> = Vec::with_capacity(samples.len());
    let last = samples.len() - 1;
    for (i, (&p, &r)) in samples.iter().zip(&radii).enumerate() {
        let prev = samples[i.saturating_sub(1)];
        let next = samples[(i + 1).min(last)];
        let normal = direction(prev, next).turn_90() * r;
        let (l, rt) = (p + normal, p - normal);
        let keep = i == 0
            || i == last
            || left.last().is_none_or(|q| q.distance(l) > min_spacing)
            || right.last().is_none_or(|q| q.distance(rt) > min_spacing);
        if keep {
            left.push(l);
            right.push(rt);
        }
    }

    let first_dir = direction(samples[0], samples[1.min(last)]);
    let last_dir = direction(samples[last.saturating_sub(1)], samples[last]);

    let mut outline = left;
    outline.extend(round_cap(samples[last], last_dir, radii[last]));
    outline.extend(right.into_iter().rev());
    outline.extend(round_cap(samples[0], -first_dir, radii[0]));
    outline
}

/// Pull each sample toward its predecessor. The final raw sample is kept so
/// the stroke ends where the pointer did.
fn streamline(points: &[Point], amount: f64) -> Vec<Point> {
    let t = 0.15 + (1.0 - amount.clamp(0.0, 1.0)) * 0.85;
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for &p in &points[1..points.len() - 1] {
        let prev = out[out.len() - 1];
        out.push(prev.lerp(p, t));
    }
    out.push(points[points.len() - 1]);
    out
}

/// Radius per sample from pressure simulated out of segment lengths.
fn pressure_radii(samples: &[Point], options: &OutlineOptions) -> Vec<f64> {
    let mut pressure = 0.5;
    let mut radii = Vec::with_capacity(samples.len());
    radii.push(options.radius(pressure));
    for pair in samples.windows(2) {
        let speed = (pair[0].distance(pair[1]) / options.size.max(f64::EPSILON)).min(1.0);
        let target = 1.0 - speed;
        pressure = (pressure + (target - pressure) * speed * PRESSURE_RATE).clamp(0.0, 1.0);
        radii.push(options.radius(pressure));
    }
    radii
}

fn direction(from: Point, to: Point) -> Vec2 {
    let d = to - from;
    let len = d.hypot();
    if len > f64::EPSILON {
        d / len
    } else {
        Vec2::new(1.0, 0.0)
    }
}

/// Half circle around `center` bulging toward `forward`, from the left side
/// to the right side of the stroke.
fn round_cap(center: Point, forward: Vec2, radius: f64) -> impl Iterator<Item = Point> {
    let start = forward.turn_90().atan2();
    (1..CAP_SEGMENTS).map(move |i| {
        let angle = start - PI * i as f64 / CAP_SEGMENTS as f64;
        center + Vec2::from_angle(angle) * radius
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(n: usize, step: f64) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64 * step, 0.0)).collect()
    }

    #[test]
    fn test_too_few_points() {
        let options = OutlineOptions::for_stroke_width(2.0);
        assert!(stroke_outline(&[], &options).is_empty());
        assert!(stroke_outline(&[Point::ZERO], &options).is_empty());
    }

    #[test]
    fn test_parameters_for_width() {
        let options = OutlineOptions::for_stroke_width(2.0);
        assert_eq!(options.size, 10.0);
        assert_eq!(options.thinning, 0.5);
        assert_eq!(options.smoothing, 0.5);
        assert_eq!(options.streamline, 0.5);
    }

    #[test]
    fn test_outline_surrounds_stroke() {
        let options = OutlineOptions::for_stroke_width(2.0);
        let outline = stroke_outline(&horizontal(11, 10.0), &options);
        assert!(outline.len() > 4);

        let max_radius = options.size * 0.75;
        for p in &outline {
            assert!(p.y.abs() <= max_radius + 1e-9, "{p:?} too far from the stroke");
        }
        let min_x = outline.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = outline.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x < 0.0);
        assert!(max_x > 100.0);
        // Both sides of the stroke are covered.
        assert!(outline.iter().any(|p| p.y > 1.0));
        assert!(outline.iter().any(|p| p.y < -1.0));
    }

    #[test]
    fn test_repeated_points_do_not_produce_nan() {
        let options = OutlineOptions::for_stroke_width(1.0);
        let outline = stroke_outline(&[Point::new(5.0, 5.0); 4], &options);
        assert!(!outline.is_empty());
        assert!(outline.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_streamline_keeps_endpoints() {
        let points = horizontal(5, 10.0);
        let smoothed = streamline(&points, 0.5);
        assert_eq!(smoothed.first(), points.first());
        assert_eq!(smoothed.last(), points.last());
        assert!(smoothed[1].x < points[1].x);
    }
}
