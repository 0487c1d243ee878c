// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance-based point keys.
//!
//! A point is rounded to a number of decimal digits derived from the point
//! tolerance and stored as scaled integers, so two endpoints that round to
//! the same coordinates hash to the same key.

use nalgebra::Point3;

/// Digits used when the tolerance cannot produce a precision.
pub const FALLBACK_PRECISION: u32 = 6;

/// Largest precision accepted; keeps the scaled coordinates well inside `i64`.
const MAX_PRECISION: u32 = 12;

/// Rounded coordinate triple used only for hashing and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Number of decimal digits kept for a given tolerance:
/// `max(0, round(-log10(tolerance)))`.
pub fn precision_for(tolerance: f64) -> u32 {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return FALLBACK_PRECISION;
    }
    let digits = (-tolerance.log10()).round();
    if digits <= 0.0 {
        0
    } else {
        (digits as u32).min(MAX_PRECISION)
    }
}

/// Map a point to its rounded key at the precision implied by `tolerance`.
pub fn quantize(point: &Point3<f64>, tolerance: f64) -> PointKey {
    let scale = 10f64.powi(precision_for(tolerance) as i32);
    let round = |c: f64| {
        // -0.0 and 0.0 must land on the same key
        let scaled = (c * scale).round();
        if scaled == 0.0 {
            0
        } else {
            scaled as i64
        }
    };

    PointKey {
        x: round(point.x),
        y: round(point.y),
        z: round(point.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_follows_tolerance() {
        assert_eq!(precision_for(0.01), 2);
        assert_eq!(precision_for(0.001), 3);
        assert_eq!(precision_for(0.5), 0);
        assert_eq!(precision_for(10.0), 0);
    }

    #[test]
    fn non_positive_tolerance_falls_back() {
        assert_eq!(precision_for(0.0), FALLBACK_PRECISION);
        assert_eq!(precision_for(-1.0), FALLBACK_PRECISION);
        assert_eq!(precision_for(f64::NAN), FALLBACK_PRECISION);

        let a = quantize(&Point3::new(1.0000001, 0.0, 0.0), 0.0);
        let b = quantize(&Point3::new(1.000002, 0.0, 0.0), 0.0);
        assert_ne!(a, b);
    }

    #[test]
    fn nearby_points_share_a_key() {
        let a = quantize(&Point3::new(5.001, 2.0, 0.0), 0.01);
        let b = quantize(&Point3::new(4.999, 2.002, 0.0), 0.01);
        assert_eq!(a, b);

        let c = quantize(&Point3::new(5.02, 2.0, 0.0), 0.01);
        assert_ne!(a, c);
    }

    #[test]
    fn signed_zero_is_normalized() {
        let a = quantize(&Point3::new(-0.001, 0.0, 0.0), 0.01);
        let b = quantize(&Point3::new(0.001, 0.0, 0.0), 0.01);
        assert_eq!(a, b);
        assert_eq!(a.x, 0);
    }
}
