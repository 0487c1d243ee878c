// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Duct and cable-tray centerlines from CAD edge lines
//!
//! Linear building services are usually drawn as two parallel edge lines.
//! This crate finds those edge pairs in the line geometry of a drawing layer
//! and synthesizes one centerline plus width per pair:
//! 1. Ingest raw lines, dropping degenerate ones
//! 2. Detect endpoints shared by several segments
//! 3. Split those endpoints apart along their segments
//! 4. Match parallel segments by alignment, separation and overlap
//! 5. Build the midway centerline over the shared span of each pair
//!
//! # Usage
//!
//! ```rust,ignore
//! use linerun_centerline::{extract_centerlines, PairingConfig, RawLine};
//!
//! let lines = vec![
//!     RawLine::planar("M-DUCT", 0.0, 0.0, 10.0, 0.0),
//!     RawLine::planar("M-DUCT", 0.0, 1.0, 10.0, 1.0),
//! ];
//!
//! let centerlines = extract_centerlines(&lines, &PairingConfig::default())?;
//! assert_eq!(centerlines[0].width, 1.0);
//! ```

pub mod centerline;
pub mod coincident;
pub mod config;
pub mod error;
pub mod layer;
pub mod matcher;
pub mod projection;
pub mod quantize;
pub mod types;

// Re-export commonly used types and functions
pub use centerline::{synthesize, synthesize_all};
pub use coincident::{
    find_coincident_groups, split_coincident_points, CoincidentGroup, CoincidentMember,
};
pub use config::PairingConfig;
pub use error::{Error, Result};
pub use layer::{
    group_by_layer, process_drawing, process_layer, DrawingSource, LayerFilter, LayerResult,
    LayerStats,
};
pub use matcher::{alignment, evaluate_pair, find_parallel_pairs, perpendicular_distance, MatchStats};
pub use projection::{overlap_length, project, project_onto_line};
pub use quantize::{quantize, PointKey};
pub use types::{Centerline, EndpointRole, LineSegment, ParallelPair, Point3D, RawLine};

/// Run the whole pipeline over `lines` as a single layer.
///
/// Layer tags on the input are ignored; use [`process_drawing`] to keep
/// layers apart.
pub fn extract_centerlines(lines: &[RawLine], config: &PairingConfig) -> Result<Vec<Centerline>> {
    let result = process_layer("", lines, config)?;
    Ok(result.centerlines)
}
