// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thresholds shared by every stage of the pairing pipeline.
//!
//! All lengths are abstract length units: the caller supplies them in
//! whatever internal unit the drawing uses. The defaults assume meters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for endpoint splitting, pair matching and centerline synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Rounding tolerance used to decide whether two endpoints coincide.
    /// Default: 0.01
    pub point_tolerance: f64,

    /// Minimum `|dot(dir_a, dir_b)|` for two segments to count as parallel.
    /// Default: 0.999 (~2.5 degrees, either orientation)
    pub parallel_threshold: f64,

    /// Smallest accepted perpendicular separation between paired edges.
    /// Default: 0.08
    pub min_distance: f64,

    /// Largest accepted perpendicular separation between paired edges.
    /// Default: 2.5
    pub max_distance: f64,

    /// Minimum shared span along the edges. Default: 0.01
    pub min_overlap: f64,

    /// Endpoint distance under which two segments are treated as touching.
    /// Default: 0.02
    pub coincident_threshold: f64,

    /// Outward displacement applied to coincident endpoints. Default: 0.001
    pub split_epsilon: f64,

    /// Segments shorter than this are dropped at ingestion. Default: 0.01
    pub min_segment_length: f64,

    /// Overlap below this value is replaced by `nominal_coincident_overlap`
    /// when the two segments touch end to end. Default: 0.01
    pub coincident_overlap_floor: f64,

    /// Overlap reported for touching segments with no real shared span.
    /// Default: 0.001
    pub nominal_coincident_overlap: f64,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            point_tolerance: 0.01,
            parallel_threshold: 0.999,
            min_distance: 0.08,
            max_distance: 2.5,
            min_overlap: 0.01,
            coincident_threshold: 0.02,
            split_epsilon: 0.001,
            min_segment_length: 0.01,
            coincident_overlap_floor: 0.01,
            nominal_coincident_overlap: 0.001,
        }
    }
}

impl PairingConfig {
    /// Parse a (possibly partial) JSON object and validate the result.
    ///
    /// Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would silently produce an empty or
    /// meaningless pairing.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("point_tolerance", self.point_tolerance),
            ("parallel_threshold", self.parallel_threshold),
            ("min_distance", self.min_distance),
            ("max_distance", self.max_distance),
            ("min_overlap", self.min_overlap),
            ("coincident_threshold", self.coincident_threshold),
            ("split_epsilon", self.split_epsilon),
            ("min_segment_length", self.min_segment_length),
            ("coincident_overlap_floor", self.coincident_overlap_floor),
            ("nominal_coincident_overlap", self.nominal_coincident_overlap),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(Error::config(field, format!("must be finite, got {value}")));
            }
            if value < 0.0 {
                return Err(Error::config(field, format!("must not be negative, got {value}")));
            }
        }

        if self.point_tolerance == 0.0 {
            return Err(Error::config("point_tolerance", "must be positive"));
        }
        if self.split_epsilon == 0.0 {
            return Err(Error::config("split_epsilon", "must be positive"));
        }
        if self.parallel_threshold == 0.0 || self.parallel_threshold > 1.0 {
            return Err(Error::config(
                "parallel_threshold",
                format!("must lie in (0, 1], got {}", self.parallel_threshold),
            ));
        }
        if self.min_distance > self.max_distance {
            return Err(Error::config(
                "min_distance",
                format!(
                    "({}) exceeds max_distance ({})",
                    self.min_distance, self.max_distance
                ),
            ));
        }
        if self.split_epsilon >= self.min_segment_length {
            return Err(Error::config(
                "split_epsilon",
                format!(
                    "({}) must be smaller than min_segment_length ({})",
                    self.split_epsilon, self.min_segment_length
                ),
            ));
        }
        if self.nominal_coincident_overlap > self.coincident_overlap_floor {
            return Err(Error::config(
                "nominal_coincident_overlap",
                format!(
                    "({}) exceeds coincident_overlap_floor ({})",
                    self.nominal_coincident_overlap, self.coincident_overlap_floor
                ),
            ));
        }

        Ok(())
    }
}
