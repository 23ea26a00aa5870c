//! Core types for the initiative tracker.
//!
//! Tracks pieces selected on a host canvas, rolls d20 initiative with a
//! per-piece modifier, orders the list for display, and steps through turns.
//! The list lives in the host document's metadata; [`EntryStore`] caches it
//! and writes it back after every change. Hosts plug in through
//! [`HostBridge`].

/// Session configuration.
pub mod config;
/// Tracked entries and object identifiers.
pub mod entry;
/// Error types used throughout the crate.
pub mod error;
/// The host application interface and an in-memory host.
pub mod host;
/// Display ordering of entries.
pub mod ordering;
/// d20 initiative rolls.
pub mod roll;
/// Persisted tracker state.
pub mod state;
/// The tracker session with load/save lifecycle.
pub mod store;

/// Re-export configuration.
pub use config::{DEFAULT_NAMESPACE, TrackerConfig};
/// Re-export entry types.
pub use entry::{ObjectId, ParticipantEntry};
/// Re-export error types.
pub use error::{HostError, HostResult, TrackerError, TrackerResult};
/// Re-export host interface types.
pub use host::{
    ActionFilter, ContextAction, HostBridge, HostEvent, HostObject, Layer, MemoryHost, Metadata,
    ObjectPredicate,
};
/// Re-export ordering functions.
pub use ordering::{active_entry, display_order};
/// Re-export roll types.
pub use roll::{InitiativeRoll, MAX_MODIFIER, clamp_modifier, roll_initiative};
/// Re-export state.
pub use state::TrackerState;
/// Re-export the store.
pub use store::EntryStore;
