// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parallel edge pairing.
//!
//! Every unordered pair of segments is tested in turn:
//! 1. Alignment: `|dot(dir_i, dir_j)|` must reach the parallel threshold.
//!    Both orientations qualify.
//! 2. Separation: the perpendicular distance must fall inside
//!    `[min_distance, max_distance]`.
//! 3. Overlap: the shared span must reach `min_overlap`, unless the end of
//!    the first segment touches the start of the second.
//!
//! Matching is quadratic in the segment count, which is fine for the few
//! hundred lines a CAD layer carries. No ranking or deduplication happens
//! here: a segment may appear in several pairs (T-junctions).

use serde::Serialize;

use crate::config::PairingConfig;
use crate::projection::overlap_length;
use crate::types::{LineSegment, ParallelPair};

/// Why a candidate pair was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Directions differ by more than the parallel threshold allows
    NotParallel,
    /// Perpendicular separation outside `[min_distance, max_distance]`
    OutOfRange,
    /// Not enough shared span and not touching end to start
    NoOverlap,
}

/// Counters from one matching run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub candidates: usize,
    pub not_parallel: usize,
    pub out_of_range: usize,
    pub no_overlap: usize,
    pub accepted: usize,
}

/// `|dot(dir_a, dir_b)|`, symmetric in its arguments
pub fn alignment(a: &LineSegment, b: &LineSegment) -> f64 {
    a.direction()
        .into_inner()
        .dot(&b.direction().into_inner())
        .abs()
        .min(1.0)
}

/// Length of the component of `b.start - a.start` orthogonal to `a`'s direction
pub fn perpendicular_distance(a: &LineSegment, b: &LineSegment) -> f64 {
    (b.start() - a.start())
        .cross(&a.direction().into_inner())
        .norm()
}

/// Run the three acceptance tests on one ordered pair.
pub fn evaluate_pair(
    line1: &LineSegment,
    line2: &LineSegment,
    config: &PairingConfig,
) -> Result<ParallelPair, Rejection> {
    let alignment = alignment(line1, line2);
    if alignment < config.parallel_threshold {
        return Err(Rejection::NotParallel);
    }

    let distance = perpendicular_distance(line1, line2);
    if distance < config.min_distance || distance > config.max_distance {
        return Err(Rejection::OutOfRange);
    }

    let overlap = overlap_length(line1, line2, config);
    let is_coincident = (line2.start() - line1.end()).norm() < config.coincident_threshold;
    if overlap < config.min_overlap && !is_coincident {
        return Err(Rejection::NoOverlap);
    }

    Ok(ParallelPair {
        line1: line1.clone(),
        line2: line2.clone(),
        perpendicular_distance: distance,
        overlap_length: overlap,
        alignment,
        is_coincident,
    })
}

/// Find every pair of segments that forms the two edges of one run.
pub fn find_parallel_pairs(segments: &[LineSegment], config: &PairingConfig) -> Vec<ParallelPair> {
    find_parallel_pairs_with_stats(segments, config).0
}

/// Same as [`find_parallel_pairs`], also reporting why candidates were dropped.
pub fn find_parallel_pairs_with_stats(
    segments: &[LineSegment],
    config: &PairingConfig,
) -> (Vec<ParallelPair>, MatchStats) {
    let mut pairs = Vec::new();
    let mut stats = MatchStats::default();

    for (i, line1) in segments.iter().enumerate() {
        for line2 in &segments[i + 1..] {
            stats.candidates += 1;
            match evaluate_pair(line1, line2, config) {
                Ok(pair) => pairs.push(pair),
                Err(Rejection::NotParallel) => stats.not_parallel += 1,
                Err(Rejection::OutOfRange) => stats.out_of_range += 1,
                Err(Rejection::NoOverlap) => stats.no_overlap += 1,
            }
        }
    }

    stats.accepted = pairs.len();
    tracing::trace!(
        candidates = stats.candidates,
        accepted = stats.accepted,
        not_parallel = stats.not_parallel,
        out_of_range = stats.out_of_range,
        no_overlap = stats.no_overlap,
        "parallel pair matching finished"
    );

    (pairs, stats)
}
