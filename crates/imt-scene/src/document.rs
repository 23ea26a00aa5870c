//! On-disk scene format.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use imt_core::{HostObject, Metadata};

use crate::error::{SceneError, SceneResult};

/// A scene as stored on disk: the pieces on the canvas plus the shared
/// metadata extensions write into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Scene title.
    #[serde(default)]
    pub name: String,
    /// Pieces on the canvas, in drawing order.
    #[serde(default)]
    pub items: Vec<HostObject>,
    /// Per-scene metadata keyed by extension namespace.
    #[serde(default)]
    pub metadata: Metadata,
}

impl SceneDocument {
    /// Read a scene file.
    pub fn read(path: &Path) -> SceneResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SceneError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the scene file as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> SceneResult<()> {
        let text = serde_json::to_string_pretty(self).map_err(|source| SceneError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text + "\n").map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
