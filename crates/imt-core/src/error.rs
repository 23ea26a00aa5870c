//! Error types for the tracker core.

use crate::entry::ObjectId;

/// Alias for `Result<T, TrackerError>`.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Alias for `Result<T, HostError>`.
pub type HostResult<T> = Result<T, HostError>;

/// Faults raised by a host application while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host cannot serve requests right now.
    #[error("host unavailable: {0}")]
    Unavailable(String),

    /// The host's backing storage failed.
    #[error("{location}: {source}")]
    Io {
        /// Where the host keeps the document, e.g. a file path.
        location: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The host's document could not be encoded or decoded.
    #[error("{location}: invalid document: {source}")]
    Json {
        /// Where the host keeps the document.
        location: String,
        /// The underlying serde error.
        source: serde_json::Error,
    },
}

/// Errors that can occur while operating on the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// A host call failed. Not retried.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The stored tracker state under the namespace key could not be decoded.
    #[error("stored tracker state under \"{namespace}\" is unreadable: {source}")]
    Decode {
        /// The metadata key that was read.
        namespace: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },

    /// The state could not be encoded for saving.
    #[error("tracker state could not be encoded: {0}")]
    Encode(serde_json::Error),

    /// No tracked entry has the given object id.
    #[error("entry not found: {0}")]
    EntryNotFound(ObjectId),

    /// The host has not signalled readiness, so no state is loaded yet.
    #[error("tracker is not ready")]
    NotReady,
}

impl TrackerError {
    /// Whether the error leaves the tracker unusable. Host and encoding
    /// faults are not recovered from.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Host(_) | Self::Decode { .. } | Self::Encode(_)
        )
    }
}
