// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Centerline synthesis for matched edge pairs

use crate::projection::{overlap_range, project_onto_line};
use crate::types::{Centerline, ParallelPair, Point3D};

/// Parameter span below which the overlap is considered empty.
const DEGENERATE_SPAN: f64 = 1e-9;

/// Build the bounded line midway between the two edges of `pair`.
///
/// The line spans only the part of `line1` covered by `line2`. Pairs accepted
/// because they touch end to end have no such span; those use the whole of
/// `line1`. The width is the pair's perpendicular distance.
pub fn synthesize(pair: &ParallelPair) -> Centerline {
    let line1 = &pair.line1;
    let line2 = &pair.line2;

    let (mut s, mut e) = overlap_range(line1, line2);
    if e - s <= DEGENERATE_SPAN {
        s = 0.0;
        e = 1.0;
    }

    let start1 = line1.point_at(s);
    let end1 = line1.point_at(e);

    let (_, start2) = project_onto_line(&start1, &line2.start(), &line2.end());
    let (_, end2) = project_onto_line(&end1, &line2.start(), &line2.end());

    let center_start = nalgebra::center(&start1, &start2);
    let center_end = nalgebra::center(&end1, &end2);

    Centerline {
        start: Point3D::from_nalgebra(&center_start),
        end: Point3D::from_nalgebra(&center_end),
        width: pair.perpendicular_distance,
    }
}

/// Synthesize one centerline per pair, in pair order.
pub fn synthesize_all(pairs: &[ParallelPair]) -> Vec<Centerline> {
    pairs.iter().map(synthesize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingConfig;
    use crate::matcher::evaluate_pair;
    use crate::types::LineSegment;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::new(Point3::new(x1, y1, 0.0), Point3::new(x2, y2, 0.0), 0.01).unwrap()
    }

    fn pair(a: LineSegment, b: LineSegment) -> ParallelPair {
        evaluate_pair(&a, &b, &PairingConfig::default()).unwrap()
    }

    #[test]
    fn full_overlap_centerline() {
        let line = synthesize(&pair(seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 1.0, 10.0, 1.0)));

        assert_eq!(line.start, Point3D::new(0.0, 0.5, 0.0));
        assert_eq!(line.end, Point3D::new(10.0, 0.5, 0.0));
        assert_relative_eq!(line.width, 1.0);
    }

    #[test]
    fn centerline_is_clipped_to_shared_span() {
        let line = synthesize(&pair(seg(0.0, 0.0, 10.0, 0.0), seg(4.0, 1.0, 14.0, 1.0)));

        assert_relative_eq!(line.start.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(line.start.y, 0.5, epsilon = 1e-9);
        assert_relative_eq!(line.end.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(line.end.y, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn reversed_second_edge_gives_same_span() {
        let line = synthesize(&pair(seg(0.0, 0.0, 10.0, 0.0), seg(14.0, 1.0, 4.0, 1.0)));

        assert_relative_eq!(line.start.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(line.end.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(line.length(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn touching_pair_falls_back_to_first_edge() {
        // line2 starts where line1 ends, offset sideways by less than the
        // coincident threshold plus enough to be a valid separation
        let config = PairingConfig {
            coincident_threshold: 0.2,
            ..Default::default()
        };
        let a = seg(0.0, 0.0, 5.0, 0.0);
        let b = seg(5.0, 0.1, 10.0, 0.1);
        let accepted = evaluate_pair(&a, &b, &config).unwrap();
        assert!(accepted.is_coincident);

        let line = synthesize(&accepted);
        assert_relative_eq!(line.start.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(line.end.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(line.start.y, 0.05, epsilon = 1e-9);
    }

    #[test]
    fn centerline_is_equidistant_from_both_edges() {
        let a = seg(1.0, 1.0, 9.0, 5.0);
        let dir = (Point3::new(9.0, 5.0, 0.0) - Point3::new(1.0, 1.0, 0.0)).normalize();
        let normal = nalgebra::Vector3::new(-dir.y, dir.x, 0.0);
        let offset = normal * 0.8;
        let b = LineSegment::new(
            Point3::new(3.0, 2.0, 0.0) + offset,
            Point3::new(11.0, 6.0, 0.0) + offset,
            0.01,
        )
        .unwrap();

        let accepted = pair(a.clone(), b.clone());
        let line = synthesize(&accepted);
        let center = line.start.to_nalgebra();

        let (_, on_a) = project_onto_line(&center, &a.start(), &a.end());
        let (_, on_b) = project_onto_line(&center, &b.start(), &b.end());

        assert_relative_eq!((center - on_a).norm(), line.width / 2.0, epsilon = 1e-9);
        assert_relative_eq!((center - on_b).norm(), line.width / 2.0, epsilon = 1e-9);
    }
}
