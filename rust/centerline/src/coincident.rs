// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detection and splitting of shared endpoints.
//!
//! CAD layers routinely contain segments that touch at a corner. Left alone,
//! those endpoints look numerically identical to the matcher. The detector
//! buckets every endpoint by its [`PointKey`]; the splitter then pushes each
//! member of a bucket outward along its own segment so the touching segments
//! become adjacent instead of identical.

use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::quantize::{quantize, PointKey};
use crate::types::{EndpointRole, LineSegment};

/// Upper bound on displacement steps for one endpoint.
const MAX_SPLIT_STEPS: usize = 1000;

/// One endpoint taking part in a coincident group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoincidentMember {
    pub segment_index: usize,
    pub role: EndpointRole,
    pub point: Point3<f64>,
}

/// Endpoints from two or more segments that round to the same key
#[derive(Debug, Clone, PartialEq)]
pub struct CoincidentGroup {
    pub key: PointKey,
    pub members: Vec<CoincidentMember>,
}

/// Bucket every endpoint by its rounded key and report the buckets with more
/// than one member.
///
/// Groups are ordered by their first member's segment index; members keep
/// segment order (START before END).
pub fn find_coincident_groups(segments: &[LineSegment], tolerance: f64) -> Vec<CoincidentGroup> {
    let mut buckets: FxHashMap<PointKey, Vec<CoincidentMember>> = FxHashMap::default();

    for (segment_index, segment) in segments.iter().enumerate() {
        for role in [EndpointRole::Start, EndpointRole::End] {
            let point = segment.endpoint(role);
            buckets
                .entry(quantize(&point, tolerance))
                .or_default()
                .push(CoincidentMember {
                    segment_index,
                    role,
                    point,
                });
        }
    }

    let mut groups: Vec<CoincidentGroup> = buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key, members)| CoincidentGroup { key, members })
        .collect();

    groups.sort_by_key(|g| {
        let first = &g.members[0];
        (first.segment_index, first.role == EndpointRole::End)
    });

    groups
}

/// Push every coincident endpoint outward by `epsilon` and return the
/// rebuilt collection.
///
/// END endpoints move forward along their segment, START endpoints move
/// backward. When a displaced endpoint still rounds to a key that is taken,
/// either by a member already placed or by another group's shared point, the
/// displacement grows in further multiples of `epsilon`. The total
/// displacement stays below `max_displacement`; the first `epsilon` step is
/// always applied. Members that cannot be separated within that bound (exact
/// duplicates travelling the same way, crowded corners) keep the last attempt
/// and are logged.
pub fn split_coincident_points(
    mut segments: Vec<LineSegment>,
    groups: &[CoincidentGroup],
    epsilon: f64,
    tolerance: f64,
    max_displacement: f64,
) -> Vec<LineSegment> {
    if groups.is_empty() || epsilon.is_nan() || epsilon <= 0.0 {
        return segments;
    }

    let shared: FxHashSet<PointKey> = groups.iter().map(|g| g.key).collect();
    let mut placed: FxHashSet<PointKey> = FxHashSet::default();

    for group in groups {
        let taken = |key: &PointKey, placed: &FxHashSet<PointKey>| {
            placed.contains(key) || (*key != group.key && shared.contains(key))
        };

        for member in &group.members {
            let Some(original) = segments.get(member.segment_index) else {
                continue;
            };

            let mut steps = 1;
            let mut candidate = original.extended(member.role, epsilon);
            let mut key = quantize(&candidate.endpoint(member.role), tolerance);

            while taken(&key, &placed)
                && steps < MAX_SPLIT_STEPS
                && epsilon * ((steps + 1) as f64) < max_displacement
            {
                steps += 1;
                candidate = original.extended(member.role, epsilon * steps as f64);
                key = quantize(&candidate.endpoint(member.role), tolerance);
            }

            if taken(&key, &placed) {
                tracing::warn!(
                    segment = member.segment_index,
                    role = ?member.role,
                    displacement = epsilon * steps as f64,
                    "coincident endpoint could not be separated within the displacement bound"
                );
            }

            placed.insert(key);
            segments[member.segment_index] = candidate;
        }
    }

    segments
}
