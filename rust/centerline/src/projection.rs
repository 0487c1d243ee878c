// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar projection and overlap between segments

use nalgebra::Point3;

use crate::config::PairingConfig;
use crate::types::LineSegment;

/// Squared basis length under which a line is treated as a point.
const DEGENERATE_LENGTH_SQ: f64 = 1e-10;

/// Project `point` onto the segment `line_start..line_end`.
///
/// Returns the parameter `t` (0 at `line_start`, 1 at `line_end`) clamped to
/// `[0, 1]` together with the projected point. A degenerate basis yields
/// `(0, line_start)`.
pub fn project(
    point: &Point3<f64>,
    line_start: &Point3<f64>,
    line_end: &Point3<f64>,
) -> (f64, Point3<f64>) {
    match line_parameter(point, line_start, line_end) {
        Some(t) => {
            let t = t.clamp(0.0, 1.0);
            (t, *line_start + (line_end - line_start) * t)
        }
        None => (0.0, *line_start),
    }
}

/// Project `point` onto the infinite line through `line_start` and `line_end`.
///
/// Same as [`project`] without clamping, so `t` may fall outside `[0, 1]`.
pub fn project_onto_line(
    point: &Point3<f64>,
    line_start: &Point3<f64>,
    line_end: &Point3<f64>,
) -> (f64, Point3<f64>) {
    match line_parameter(point, line_start, line_end) {
        Some(t) => (t, *line_start + (line_end - line_start) * t),
        None => (0.0, *line_start),
    }
}

fn line_parameter(
    point: &Point3<f64>,
    line_start: &Point3<f64>,
    line_end: &Point3<f64>,
) -> Option<f64> {
    let basis = line_end - line_start;
    let length_sq = basis.norm_squared();
    if length_sq < DEGENERATE_LENGTH_SQ {
        return None;
    }
    Some((point - line_start).dot(&basis) / length_sq)
}

/// Parameter range `[s, e]` of `line1` covered by the projection of `line2`.
///
/// `e <= s` means the projections do not overlap.
pub fn overlap_range(line1: &LineSegment, line2: &LineSegment) -> (f64, f64) {
    let (t_a, _) = project(&line2.start(), &line1.start(), &line1.end());
    let (t_b, _) = project(&line2.end(), &line1.start(), &line1.end());

    let s = t_a.min(t_b).max(0.0);
    let e = t_a.max(t_b).min(1.0);
    (s, e)
}

/// Length of `line1` shared with the projection of `line2`.
///
/// Segments that only touch end to end have no real overlap; when the
/// overlap falls under `coincident_overlap_floor` and the nearest endpoints
/// are within `coincident_threshold`, `nominal_coincident_overlap` is
/// reported instead of the geometric value.
pub fn overlap_length(line1: &LineSegment, line2: &LineSegment, config: &PairingConfig) -> f64 {
    let (s, e) = overlap_range(line1, line2);
    let overlap = ((e - s) * line1.length()).max(0.0);

    if overlap < config.coincident_overlap_floor
        && nearest_endpoint_distance(line1, line2) < config.coincident_threshold
    {
        return config.nominal_coincident_overlap;
    }

    overlap
}

/// Smallest distance between any endpoint of `line1` and any endpoint of `line2`
pub fn nearest_endpoint_distance(line1: &LineSegment, line2: &LineSegment) -> f64 {
    let others = [line2.start(), line2.end()];
    [line1.start(), line1.end()]
        .into_iter()
        .flat_map(|a| others.map(|b| (b - a).norm()))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::new(Point3::new(x1, y1, 0.0), Point3::new(x2, y2, 0.0), 0.0).unwrap()
    }

    #[test]
    fn projecting_endpoints_onto_own_line() {
        let line = seg(1.0, 2.0, 7.0, -3.0);

        let (t0, p0) = project(&line.start(), &line.start(), &line.end());
        let (t1, p1) = project(&line.end(), &line.start(), &line.end());

        assert_relative_eq!(t0, 0.0);
        assert_relative_eq!(t1, 1.0);
        assert_relative_eq!(p0, line.start());
        assert_relative_eq!(p1, line.end());
    }

    #[test]
    fn projection_is_clamped() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(10.0, 0.0, 0.0);

        let (t, p) = project(&Point3::new(15.0, 3.0, 0.0), &start, &end);
        assert_relative_eq!(t, 1.0);
        assert_relative_eq!(p, end);

        let (t, _) = project_onto_line(&Point3::new(15.0, 3.0, 0.0), &start, &end);
        assert_relative_eq!(t, 1.5);
    }

    #[test]
    fn degenerate_basis_returns_start() {
        let start = Point3::new(2.0, 2.0, 0.0);
        let (t, p) = project(&Point3::new(5.0, 5.0, 0.0), &start, &start);

        assert_eq!(t, 0.0);
        assert_eq!(p, start);

        let (t, p) = project_onto_line(&Point3::new(5.0, 5.0, 0.0), &start, &start);
        assert_eq!(t, 0.0);
        assert_eq!(p, start);
    }

    #[test]
    fn partial_overlap_length() {
        let config = PairingConfig::default();
        let line1 = seg(0.0, 0.0, 10.0, 0.0);
        let line2 = seg(4.0, 1.0, 14.0, 1.0);

        assert_relative_eq!(overlap_length(&line1, &line2, &config), 6.0, epsilon = 1e-9);
        assert_relative_eq!(overlap_length(&line2, &line1, &config), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_orientation_overlaps_the_same() {
        let config = PairingConfig::default();
        let line1 = seg(0.0, 0.0, 10.0, 0.0);
        let line2 = seg(14.0, 1.0, 4.0, 1.0);

        assert_relative_eq!(overlap_length(&line1, &line2, &config), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_segments_do_not_overlap() {
        let config = PairingConfig::default();
        let line1 = seg(0.0, 0.0, 10.0, 0.0);
        let line2 = seg(12.0, 1.0, 20.0, 1.0);

        assert_eq!(overlap_length(&line1, &line2, &config), 0.0);
    }

    #[test]
    fn touching_segments_get_nominal_overlap() {
        let config = PairingConfig::default();
        let line1 = seg(0.0, 0.0, 5.0, 0.0);
        let line2 = seg(5.005, 0.0, 10.0, 0.0);

        assert_relative_eq!(
            overlap_length(&line1, &line2, &config),
            config.nominal_coincident_overlap
        );
    }

    #[test]
    fn nominal_overlap_is_configurable() {
        let config = PairingConfig {
            nominal_coincident_overlap: 0.004,
            ..Default::default()
        };
        let line1 = seg(0.0, 0.0, 5.0, 0.0);
        let line2 = seg(5.0, 0.0, 10.0, 0.0);

        assert_relative_eq!(overlap_length(&line1, &line2, &config), 0.004);
    }

    #[test]
    fn sliding_apart_never_increases_overlap() {
        let config = PairingConfig::default();
        let line1 = seg(0.0, 0.0, 10.0, 0.0);

        let mut previous = f64::INFINITY;
        for step in 0..30 {
            let shift = step as f64 * 0.5;
            let line2 = seg(shift, 1.0, 10.0 + shift, 1.0);
            let overlap = overlap_length(&line1, &line2, &config);
            assert!(overlap <= previous + 1e-9, "overlap grew at shift {shift}");
            previous = overlap;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn nearest_endpoints() {
        let line1 = seg(0.0, 0.0, 5.0, 0.0);
        let line2 = seg(8.0, 4.0, 5.0, 4.0);
        assert_relative_eq!(nearest_endpoint_distance(&line1, &line2), 4.0);
    }
}
