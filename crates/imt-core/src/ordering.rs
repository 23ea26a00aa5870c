//! Display order for tracked entries.
//!
//! Highest initiative first, then highest modifier, then highest raw roll
//! (unrolled counts as 0). Full ties keep insertion order.

use std::cmp::Ordering;

use crate::entry::ParticipantEntry;

/// Compare two entries for display; `Less` means `a` is shown first.
pub fn compare(a: &ParticipantEntry, b: &ParticipantEntry) -> Ordering {
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| b.modifier.cmp(&a.modifier))
        .then_with(|| b.roll_or_zero().cmp(&a.roll_or_zero()))
}

/// Entries in display order. The input slice is left in storage order.
pub fn display_order(entries: &[ParticipantEntry]) -> Vec<&ParticipantEntry> {
    let mut ordered: Vec<&ParticipantEntry> = entries.iter().collect();
    // sort_by is stable
    ordered.sort_by(|a, b| compare(a, b));
    ordered
}

/// The entry whose turn it is: position `active_index` of the display order.
///
/// Because the order is recomputed from current values, a re-roll can move a
/// different entry under the same index without the turn advancing.
pub fn active_entry(entries: &[ParticipantEntry], active_index: usize) -> Option<&ParticipantEntry> {
    display_order(entries).get(active_index).copied()
}
