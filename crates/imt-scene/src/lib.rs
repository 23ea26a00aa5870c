//! File-backed scene host for the initiative tracker.
//!
//! A scene file is a JSON document holding the pieces on a canvas and the
//! metadata extensions store per scene. [`SceneHost`] serves it through the
//! [`imt_core::HostBridge`] interface and adds the host-side pieces a user
//! interacts with: selection, context actions, and the readiness signal.

/// The on-disk scene format.
pub mod document;
/// Error types for scene operations.
pub mod error;
/// The scene file as a host.
pub mod host;

/// Re-export the scene document.
pub use document::SceneDocument;
/// Re-export error types.
pub use error::{SceneError, SceneResult};
/// Re-export the host.
pub use host::SceneHost;
