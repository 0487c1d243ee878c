// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for line pairing.

/// Result type alias for pairing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or feeding the pipeline.
///
/// Geometric degeneracy is never an error: short segments are dropped at
/// ingestion and an empty pairing is a valid outcome.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A threshold is out of range or inconsistent with another one.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
