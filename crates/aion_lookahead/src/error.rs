//! Error types for lookahead construction, queries, and persistence.

use crate::ids::NodeId;

/// Errors that can occur while building or querying the routing-cost lookahead.
///
/// These are hard errors: the caller does not retry, and the core does not
/// attempt recovery. Per-segment "no sources found" is deliberately *not*
/// an error — it is a warning emitted through the [`aion_diagnostics`]
/// sink, since a sparse or all-extrapolated grid for one segment is a
/// usable (if degraded) result.
#[derive(Debug, thiserror::Error)]
pub enum LookaheadError {
    /// A start or query node has no canonical location in the
    /// connection-box database.
    #[error("no canonical location for node {0}")]
    MissingCanonicalLocation(NodeId),

    /// An IPIN node has no connection box.
    #[error("no connection box for ipin {0}")]
    MissingConnectionBox(NodeId),

    /// A `find_cost` query named a segment index with no cost map entry.
    #[error("segment {0} has no cost map (was compute() run?)")]
    UnknownSegment(u32),

    /// The persisted container's version tag does not match this build.
    #[error("lookahead file version mismatch: found {found}, expected {expected}")]
    VersionMismatch {
        /// Version tag found in the file.
        found: u32,
        /// Version tag this build expects.
        expected: u32,
    },

    /// The persisted container was truncated or had an inconsistent length
    /// prefix.
    #[error("malformed lookahead file: {0}")]
    MalformedFile(String),

    /// An I/O error occurred while reading or writing the persisted file.
    #[error("lookahead I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted binary payload failed to decode.
    #[error("lookahead decode error: {0}")]
    Decode(String),

    /// The persisted binary payload failed to encode.
    #[error("lookahead encode error: {0}")]
    Encode(String),
}
