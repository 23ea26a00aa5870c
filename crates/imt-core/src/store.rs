//! The tracker session: in-memory state plus its persistence lifecycle.
//!
//! [`EntryStore`] caches the [`TrackerState`] stored in the host document.
//! It is created by loading from the host and writes the whole state back
//! after every mutation. Saves overwrite unconditionally; if another client
//! wrote in between, the last save wins.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::entry::{DEFAULT_NAME, ObjectId, ParticipantEntry};
use crate::error::{TrackerError, TrackerResult};
use crate::host::{HostBridge, Metadata};
use crate::roll::{InitiativeRoll, clamp_modifier, roll_initiative};
use crate::state::TrackerState;

/// Owned tracker session for one host document.
#[derive(Debug)]
pub struct EntryStore {
    namespace: String,
    state: TrackerState,
    rng: StdRng,
}

impl EntryStore {
    /// Load the stored state from the host document.
    ///
    /// A missing (or `null`) value under the namespace key yields an empty
    /// tracker.
    pub fn load<H: HostBridge + ?Sized>(config: &TrackerConfig, host: &H) -> TrackerResult<Self> {
        let metadata = host.document_metadata()?;
        let state = match metadata.get(&config.namespace) {
            None | Some(serde_json::Value::Null) => TrackerState::new(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|source| {
                TrackerError::Decode {
                    namespace: config.namespace.clone(),
                    source,
                }
            })?,
        };
        info!(
            namespace = %config.namespace,
            entries = state.len(),
            active_index = state.active_index,
            "loaded tracker state"
        );

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            namespace: config.namespace.clone(),
            state,
            rng,
        })
    }

    /// The cached state.
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// The metadata key this store writes to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Write the whole state under the namespace key.
    pub fn save<H: HostBridge + ?Sized>(&self, host: &mut H) -> TrackerResult<()> {
        let value = serde_json::to_value(&self.state).map_err(TrackerError::Encode)?;
        let mut update = Metadata::new();
        update.insert(self.namespace.clone(), value);
        host.set_document_metadata(update)?;
        debug!(namespace = %self.namespace, entries = self.state.len(), "saved tracker state");
        Ok(())
    }

    /// Track each id that is not tracked yet and that the host can resolve.
    ///
    /// Duplicates and unknown objects are skipped without error. Saves once
    /// for the whole batch. Returns how many entries were added.
    pub fn add_entries<H: HostBridge + ?Sized>(
        &mut self,
        host: &mut H,
        ids: &[ObjectId],
    ) -> TrackerResult<usize> {
        let mut added = 0;
        for id in ids {
            if self.state.contains(id) {
                debug!(%id, "already tracked, skipping");
                continue;
            }
            let Some(object) = host.resolve_object(id)? else {
                debug!(%id, "object not found, skipping");
                continue;
            };
            let name = object.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
            debug!(%id, %name, "tracking");
            self.state
                .entries
                .push(ParticipantEntry::new(id.clone(), name));
            added += 1;
        }

        self.save(host)?;
        info!(added, requested = ids.len(), "added entries");
        Ok(added)
    }

    /// Set an entry's modifier and persist. The total is not recomputed
    /// until the next roll.
    pub fn set_modifier<H: HostBridge + ?Sized>(
        &mut self,
        host: &mut H,
        id: &ObjectId,
        value: i32,
    ) -> TrackerResult<()> {
        let entry = self
            .state
            .entry_mut(id)
            .ok_or_else(|| TrackerError::EntryNotFound(id.clone()))?;
        entry.modifier = clamp_modifier(value);
        debug!(%id, modifier = entry.modifier, "modifier set");
        self.save(host)
    }

    /// Roll initiative for an entry using its current modifier, and persist.
    pub fn roll_for<H: HostBridge + ?Sized>(
        &mut self,
        host: &mut H,
        id: &ObjectId,
    ) -> TrackerResult<InitiativeRoll> {
        let entry = self
            .state
            .entry_mut(id)
            .ok_or_else(|| TrackerError::EntryNotFound(id.clone()))?;
        let result = roll_initiative(&mut self.rng, entry.modifier);
        entry.roll = Some(result.roll);
        entry.initiative = result.total;
        info!(%id, name = %entry.name, roll = result.roll, total = result.total, "rolled initiative");
        self.save(host)?;
        Ok(result)
    }

    /// Pass the turn to the next position in the order and persist.
    ///
    /// Does nothing (and does not save) when no entries are tracked.
    /// Returns whether the pointer moved.
    pub fn advance_turn<H: HostBridge + ?Sized>(&mut self, host: &mut H) -> TrackerResult<bool> {
        if !self.state.advance() {
            debug!("no entries, turn not advanced");
            return Ok(false);
        }
        info!(active_index = self.state.active_index, "turn advanced");
        self.save(host)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::{Layer, MemoryHost};
    use proptest::prelude::*;

    fn config() -> TrackerConfig {
        TrackerConfig::default().with_seed(42)
    }

    fn host() -> MemoryHost {
        MemoryHost::new()
            .with_object("a", Some("Goblin"), Layer::Character)
            .with_object("c", Some("Ogre"), Layer::Character)
            .with_object("d", None, Layer::Character)
    }

    fn ids(raw: &[&str]) -> Vec<ObjectId> {
        raw.iter().map(|s| ObjectId::new(*s)).collect()
    }

    #[test]
    fn load_missing_state_is_empty() {
        let host = host();
        let store = EntryStore::load(&config(), &host).unwrap();
        assert!(store.state().is_empty());
        assert_eq!(store.state().active_index, 0);
    }

    #[test]
    fn load_null_state_is_empty() {
        let mut host = host();
        host.metadata_mut()
            .insert(config().namespace, serde_json::Value::Null);
        let store = EntryStore::load(&config(), &host).unwrap();
        assert!(store.state().is_empty());
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let mut host = host();
        host.metadata_mut()
            .insert(config().namespace, serde_json::json!("not a tracker"));
        let err = EntryStore::load(&config(), &host).unwrap_err();
        assert!(matches!(err, TrackerError::Decode { .. }));
    }

    #[test]
    fn add_skips_duplicates_and_unresolved() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();

        let added = store
            .add_entries(&mut host, &ids(&["a", "a", "b"]))
            .unwrap();

        assert_eq!(added, 1);
        let entries = &store.state().entries;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, ObjectId::new("a"));
        assert_eq!(entries[0].name, "Goblin");
        assert_eq!(entries[0].initiative, 0);
        assert_eq!(entries[0].modifier, 0);
        assert_eq!(entries[0].roll, None);
    }

    #[test]
    fn add_saves_once_per_batch() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store
            .add_entries(&mut host, &ids(&["a", "c", "d"]))
            .unwrap();
        assert_eq!(host.write_count(), 1);
    }

    #[test]
    fn add_saves_even_when_nothing_added() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        assert_eq!(store.add_entries(&mut host, &ids(&["zz"])).unwrap(), 0);
        assert_eq!(host.write_count(), 1);
    }

    #[test]
    fn unnamed_object_gets_placeholder() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["d"])).unwrap();
        assert_eq!(store.state().entries[0].name, "Token");
    }

    #[test]
    fn re_adding_across_batches_is_ignored() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a"])).unwrap();
        store.add_entries(&mut host, &ids(&["c", "a"])).unwrap();
        let names: Vec<&str> = store
            .state()
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["Goblin", "Ogre"]);
    }

    #[test]
    fn set_modifier_persists_without_touching_total() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a"])).unwrap();
        let id = ObjectId::new("a");

        store.set_modifier(&mut host, &id, 3).unwrap();

        let entry = store.state().entry(&id).unwrap();
        assert_eq!(entry.modifier, 3);
        assert_eq!(entry.initiative, 0);
        assert_eq!(host.write_count(), 2);
        let stored = &host.metadata()[store.namespace()]["entries"][0]["modifier"];
        assert_eq!(stored, &serde_json::json!(3));
    }

    #[test]
    fn huge_modifier_is_bounded_and_rolls_exactly() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a"])).unwrap();
        let id = ObjectId::new("a");

        store.set_modifier(&mut host, &id, i32::MAX).unwrap();
        let modifier = store.state().entry(&id).unwrap().modifier;
        assert_eq!(modifier, crate::roll::MAX_MODIFIER);

        let r = store.roll_for(&mut host, &id).unwrap();
        assert_eq!(r.total, r.roll + modifier);
        assert_eq!(store.state().entry(&id).unwrap().initiative, r.total);
    }

    #[test]
    fn roll_uses_current_modifier() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a"])).unwrap();
        let id = ObjectId::new("a");
        store.set_modifier(&mut host, &id, -2).unwrap();

        for _ in 0..50 {
            let r = store.roll_for(&mut host, &id).unwrap();
            assert!((1..=20).contains(&r.roll));
            assert_eq!(r.total, r.roll - 2);
            let entry = store.state().entry(&id).unwrap();
            assert_eq!(entry.roll, Some(r.roll));
            assert_eq!(entry.initiative, r.total);
        }
    }

    #[test]
    fn unknown_entry_is_reported() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        let missing = ObjectId::new("ghost");
        assert!(matches!(
            store.roll_for(&mut host, &missing),
            Err(TrackerError::EntryNotFound(_))
        ));
        assert!(matches!(
            store.set_modifier(&mut host, &missing, 1),
            Err(TrackerError::EntryNotFound(_))
        ));
        assert_eq!(host.write_count(), 0);
    }

    #[test]
    fn advance_on_empty_is_noop() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        assert!(!store.advance_turn(&mut host).unwrap());
        assert_eq!(store.state().active_index, 0);
        assert_eq!(host.write_count(), 0);
    }

    #[test]
    fn advance_wraps_and_persists() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a", "c"])).unwrap();

        assert!(store.advance_turn(&mut host).unwrap());
        assert_eq!(store.state().active_index, 1);
        store.advance_turn(&mut host).unwrap();
        assert_eq!(store.state().active_index, 0);
        assert_eq!(
            host.metadata()[store.namespace()]["activeIndex"],
            serde_json::json!(0)
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a", "c", "d"])).unwrap();
        store
            .set_modifier(&mut host, &ObjectId::new("c"), 4)
            .unwrap();
        store.roll_for(&mut host, &ObjectId::new("a")).unwrap();
        store.advance_turn(&mut host).unwrap();

        let fresh = EntryStore::load(&config(), &host).unwrap();
        assert_eq!(fresh.state(), store.state());
    }

    #[test]
    fn save_leaves_other_namespaces() {
        let mut host = host();
        host.metadata_mut()
            .insert("fog-of-war".into(), serde_json::json!({"on": true}));
        let mut store = EntryStore::load(&config(), &host).unwrap();
        store.add_entries(&mut host, &ids(&["a"])).unwrap();
        assert_eq!(host.metadata()["fog-of-war"], serde_json::json!({"on": true}));
    }

    #[test]
    fn last_save_wins_over_other_writer() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        host.metadata_mut().insert(
            config().namespace,
            serde_json::json!({"entries": [], "activeIndex": 9}),
        );
        store.add_entries(&mut host, &ids(&["a"])).unwrap();
        let fresh = EntryStore::load(&config(), &host).unwrap();
        assert_eq!(fresh.state().active_index, 0);
        assert_eq!(fresh.state().len(), 1);
    }

    #[test]
    fn host_failure_propagates() {
        let mut host = host();
        let mut store = EntryStore::load(&config(), &host).unwrap();
        host.set_offline(true);
        let err = store.add_entries(&mut host, &ids(&["a"])).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Host(HostError::Unavailable(_))
        ));
    }

    #[test]
    fn loads_documents_from_older_clients() {
        let mut host = host();
        host.metadata_mut().insert(
            config().namespace,
            serde_json::json!({
                "entries": [
                    {"tokenId": "a", "name": "Goblin", "initiative": 14, "modifier": 2, "roll": 12},
                    {"tokenId": "c", "name": "Ogre", "initiative": null, "modifier": null, "roll": null}
                ],
                "activeIndex": 1
            }),
        );
        let store = EntryStore::load(&config(), &host).unwrap();
        assert_eq!(store.state().len(), 2);
        assert_eq!(store.state().active_index, 1);
        assert_eq!(store.state().entries[1].modifier, 0);
    }

    proptest! {
        #[test]
        fn never_tracks_an_id_twice(batches in proptest::collection::vec(
            proptest::collection::vec(prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")], 0..6),
            1..5,
        )) {
            let mut host = host();
            let mut store = EntryStore::load(&config(), &host).unwrap();
            for batch in &batches {
                store.add_entries(&mut host, &ids(batch)).unwrap();
            }
            for id in ["a", "b", "c", "d"] {
                let count = store
                    .state()
                    .entries
                    .iter()
                    .filter(|e| e.id.as_str() == id)
                    .count();
                prop_assert!(count <= 1);
            }
        }

        #[test]
        fn advance_is_successor_mod_len(n in 1usize..6, start in 0usize..6, steps in 1usize..12) {
            let mut host = host();
            let mut store = EntryStore::load(&config(), &host).unwrap();
            let all = ["a", "c", "d"];
            store.add_entries(&mut host, &ids(&all[..n.min(all.len())])).unwrap();
            let len = store.state().len();
            store.state.active_index = start;
            for _ in 0..steps {
                let old = store.state().active_index;
                store.advance_turn(&mut host).unwrap();
                prop_assert_eq!(store.state().active_index, (old + 1) % len);
            }
        }
    }
}
