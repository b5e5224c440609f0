//! Steering utilities
//!
//! Headings are degrees in `[0, 360)`. The convention is fixed by
//! [`bearing`]: a heading of 0 steps toward +y, 90 toward +x.

use crate::core::types::{Point, Step};

/// Wrap any angle into `[0, 360)`
///
/// Non-finite input maps to 0.
pub fn normalize_heading(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Heading that points from `from` toward `to`
///
/// `atan2` of the deltas `(from - to)`, turned half a circle, so that a
/// target straight up the y axis gives 0.
pub fn bearing(from: Point, to: Point) -> f64 {
    let dx = f64::from(from.x) - f64::from(to.x);
    let dy = f64::from(from.y) - f64::from(to.y);
    normalize_heading(dx.atan2(dy).to_degrees() + 180.0)
}

/// Absolute difference between two headings
///
/// No wraparound: 359° and 1° are 358° apart.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    (a - b).abs()
}

/// Eight-directional unit step for a heading
///
/// Rounds the sine and cosine of the heading to the nearest of `{-1, 0, 1}`.
pub fn unit_step(heading: f64) -> Step {
    let radians = normalize_heading(heading).to_radians();
    let dx = radians.sin().round() as i64;
    let dy = radians.cos().round() as i64;
    // sin/cos are within [-1, 1] so the rounded values always fit
    Step::new(dx, dy).unwrap_or(Step::NONE)
}
