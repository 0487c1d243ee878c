// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-layer pipeline driver.
//!
//! A drawing source yields raw lines tagged by layer. Each layer is an
//! independent batch: its segments are ingested, split at shared endpoints,
//! paired and turned into centerlines in strict sequence. Layers share
//! nothing, so several of them run in parallel.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::Serialize;

use crate::centerline::synthesize_all;
use crate::coincident::{find_coincident_groups, split_coincident_points};
use crate::config::PairingConfig;
use crate::error::Result;
use crate::matcher::{find_parallel_pairs_with_stats, MatchStats};
use crate::types::{Centerline, LineSegment, ParallelPair, RawLine};

/// Anything that can hand over the raw line geometry of a drawing
pub trait DrawingSource {
    fn lines(&self) -> Vec<RawLine>;
}

impl DrawingSource for [RawLine] {
    fn lines(&self) -> Vec<RawLine> {
        self.to_vec()
    }
}

impl DrawingSource for Vec<RawLine> {
    fn lines(&self) -> Vec<RawLine> {
        self.clone()
    }
}

/// Which layers of a drawing to process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LayerFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl LayerFilter {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LayerFilter::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, layer: &str) -> bool {
        match self {
            LayerFilter::All => true,
            LayerFilter::Only(names) => names.contains(layer),
        }
    }
}

/// Counters for one processed layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerStats {
    /// Raw lines handed in
    pub input_count: usize,
    /// Raw lines dropped as too short or non-finite
    pub rejected_count: usize,
    /// Segments that entered the pipeline
    pub segment_count: usize,
    pub coincident_groups: usize,
    pub displaced_endpoints: usize,
    pub pair_count: usize,
    pub matching: MatchStats,
}

/// Everything produced for one layer
#[derive(Debug, Clone, Serialize)]
pub struct LayerResult {
    pub layer: String,
    pub centerlines: Vec<Centerline>,
    /// Accepted pairs, in the same order as `centerlines`
    #[serde(skip_serializing)]
    pub pairs: Vec<ParallelPair>,
    pub stats: LayerStats,
}

/// Group raw lines by layer name, sorted by name.
pub fn group_by_layer(lines: Vec<RawLine>) -> BTreeMap<String, Vec<RawLine>> {
    let mut layers: BTreeMap<String, Vec<RawLine>> = BTreeMap::new();
    for line in lines {
        layers.entry(line.layer.clone()).or_default().push(line);
    }
    layers
}

/// Turn raw lines into segments, dropping degenerate ones.
pub fn ingest(lines: &[RawLine], min_length: f64) -> Vec<LineSegment> {
    lines
        .iter()
        .filter_map(|raw| {
            let segment = LineSegment::from_raw(raw, min_length);
            if segment.is_none() {
                tracing::trace!(
                    layer = %raw.layer,
                    start = ?raw.start,
                    end = ?raw.end,
                    "dropping degenerate line"
                );
            }
            segment
        })
        .collect()
}

/// Run the full pipeline over the lines of one layer.
///
/// An empty `centerlines` list is a valid outcome: nothing on the layer
/// looked like a run.
pub fn process_layer(layer: &str, lines: &[RawLine], config: &PairingConfig) -> Result<LayerResult> {
    config.validate()?;
    Ok(run_layer(layer, lines, config))
}

/// Group a drawing by layer and process the selected layers in parallel.
///
/// Results are ordered by layer name.
pub fn process_drawing<S>(
    source: &S,
    filter: &LayerFilter,
    config: &PairingConfig,
) -> Result<Vec<LayerResult>>
where
    S: DrawingSource + ?Sized,
{
    config.validate()?;

    let selected: Vec<(String, Vec<RawLine>)> = group_by_layer(source.lines())
        .into_iter()
        .filter(|(name, _)| filter.matches(name))
        .collect();

    tracing::debug!(layers = selected.len(), "processing drawing");

    Ok(selected
        .into_par_iter()
        .map(|(name, lines)| run_layer(&name, &lines, config))
        .collect())
}

fn run_layer(layer: &str, lines: &[RawLine], config: &PairingConfig) -> LayerResult {
    let segments = ingest(lines, config.min_segment_length);

    let groups = find_coincident_groups(&segments, config.point_tolerance);
    let displaced_endpoints = groups.iter().map(|g| g.members.len()).sum();
    let segments = split_coincident_points(
        segments,
        &groups,
        config.split_epsilon,
        config.point_tolerance,
        config.min_overlap / 2.0,
    );

    let (pairs, matching) = find_parallel_pairs_with_stats(&segments, config);
    let centerlines = synthesize_all(&pairs);

    let stats = LayerStats {
        input_count: lines.len(),
        rejected_count: lines.len() - segments.len(),
        segment_count: segments.len(),
        coincident_groups: groups.len(),
        displaced_endpoints,
        pair_count: pairs.len(),
        matching,
    };

    tracing::debug!(
        layer,
        input = stats.input_count,
        rejected = stats.rejected_count,
        coincident_groups = stats.coincident_groups,
        pairs = stats.pair_count,
        "layer processed"
    );

    LayerResult {
        layer: layer.to_string(),
        centerlines,
        pairs,
        stats,
    }
}
