//! Error types for refloc-core

use serde::{Deserialize, Serialize};

use crate::graph::AssetKind;
use crate::ids::AssetHandle;

/// Errors surfaced by fallible refloc operations.
///
/// Per-asset failures inside a deduplication batch (a move that does not go
/// through, a clip rejected by the path guard, a cancelled enumeration) are not
/// errors; they are recorded on the report and logged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RelocError {
    /// Handle does not resolve to an asset
    #[error("Asset not found: {handle}")]
    UnknownAsset { handle: AssetHandle },

    /// Asset exists but has the wrong kind for the operation
    #[error("Asset {handle} is a {actual:?}, expected {expected:?}")]
    KindMismatch {
        handle: AssetHandle,
        expected: AssetKind,
        actual: AssetKind,
    },

    /// Deduplication requested for a kind that has no duplicate semantics
    #[error("Assets of kind {kind:?} cannot be deduplicated")]
    NotDeduplicable { kind: AssetKind },

    /// Project manifest references a path that no asset declares
    #[error("Unresolved reference '{path}' in {owner}")]
    UnresolvedReference { owner: String, path: String },

    /// Two assets in a project manifest share one path
    #[error("Duplicate asset path: {path}")]
    DuplicatePath { path: String },

    /// Structurally invalid asset data
    #[error("Invalid asset '{path}': {reason}")]
    InvalidAsset { path: String, reason: String },

    /// Invalid configuration value
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl RelocError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownAsset { .. } | Self::KindMismatch { .. } => "lookup",
            Self::NotDeduplicable { .. } => "unsupported",
            Self::UnresolvedReference { .. }
            | Self::DuplicatePath { .. }
            | Self::InvalidAsset { .. } => "project",
            Self::InvalidConfig { .. } => "config",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for RelocError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
