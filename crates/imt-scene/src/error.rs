//! Error types for the scene host.

use std::path::PathBuf;

use imt_core::{HostError, ObjectId};

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while reading, writing, or manipulating a scene file.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The scene file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// The scene file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The scene file is not valid scene JSON.
    #[error("{}: invalid scene: {source}", path.display())]
    Json {
        /// The scene file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// No item with this id is on the scene.
    #[error("no item {0} on the scene")]
    UnknownItem(ObjectId),
}

impl From<SceneError> for HostError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::Io { path, source } => HostError::Io {
                location: path.display().to_string(),
                source,
            },
            SceneError::Json { path, source } => HostError::Json {
                location: path.display().to_string(),
                source,
            },
            other @ SceneError::UnknownItem(_) => HostError::Unavailable(other.to_string()),
        }
    }
}
