use serde::{Deserialize, Serialize};

use crate::entry::{ObjectId, ParticipantEntry};

/// The persisted tracker list for one host document.
///
/// `entries` is kept in insertion order. `active_index` points into the
/// display order computed by [`crate::ordering::display_order`], not into
/// `entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    /// Tracked pieces in insertion order.
    #[serde(default)]
    pub entries: Vec<ParticipantEntry>,
    /// Whose turn it is, as a position in the display order.
    #[serde(default)]
    pub active_index: usize,
}

impl TrackerState {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an entry for the given object already exists.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    /// Look up an entry by object id.
    pub fn entry(&self, id: &ObjectId) -> Option<&ParticipantEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Look up an entry mutably by object id.
    pub fn entry_mut(&mut self, id: &ObjectId) -> Option<&mut ParticipantEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the turn pointer one step, wrapping at the entry count.
    ///
    /// Returns false and leaves the pointer alone when the list is empty.
    pub fn advance(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.active_index = (self.active_index + 1) % self.entries.len();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(n: usize) -> TrackerState {
        TrackerState {
            entries: (0..n)
                .map(|i| ParticipantEntry::new(ObjectId::new(format!("t{i}")), format!("P{i}")))
                .collect(),
            active_index: 0,
        }
    }

    #[test]
    fn advance_wraps() {
        let mut s = state_with(3);
        assert!(s.advance());
        assert_eq!(s.active_index, 1);
        s.advance();
        s.advance();
        assert_eq!(s.active_index, 0);
    }

    #[test]
    fn advance_empty_is_noop() {
        let mut s = TrackerState::new();
        assert!(!s.advance());
        assert_eq!(s.active_index, 0);
    }

    #[test]
    fn advance_from_stale_pointer_wraps_into_range() {
        let mut s = state_with(2);
        s.active_index = 5;
        s.advance();
        assert_eq!(s.active_index, 0);
    }

    #[test]
    fn lookup_by_id() {
        let mut s = state_with(2);
        assert!(s.contains(&ObjectId::new("t1")));
        assert!(!s.contains(&ObjectId::new("t7")));
        s.entry_mut(&ObjectId::new("t1")).unwrap().modifier = 4;
        assert_eq!(s.entry(&ObjectId::new("t1")).unwrap().modifier, 4);
    }

    #[test]
    fn persisted_shape_uses_camel_case() {
        let s = state_with(1);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("activeIndex").is_some());
        assert!(json.get("entries").unwrap().is_array());
    }

    #[test]
    fn missing_fields_default() {
        let s: TrackerState = serde_json::from_str("{}").unwrap();
        assert_eq!(s, TrackerState::new());
    }
}
