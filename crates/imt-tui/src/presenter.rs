//! Presenter: turns tracker state into a view model and user actions into
//! store mutations.
//!
//! [`render`] is a pure function of the state. The presenter keeps the last
//! rendered [`TrackerView`] and rebuilds it from scratch after rolls, turn
//! changes, and adds. Editing a modifier only patches that row's field, so
//! the row order stays put until the next full render.

use tracing::{info, warn};

use imt_core::{
    EntryStore, HostBridge, HostEvent, InitiativeRoll, ObjectId, TrackerConfig, TrackerError,
    TrackerResult, TrackerState, active_entry, clamp_modifier, display_order,
};

/// Label of the turn control.
pub const NEXT_TURN_LABEL: &str = "Next Turn";

/// One rendered row of the tracker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// The tracked object.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Initiative total, read-only.
    pub initiative: i32,
    /// Contents of the modifier field.
    pub modifier_field: String,
    /// Last raw roll, if any.
    pub roll: Option<i32>,
    /// Whether it is this row's turn.
    pub active: bool,
}

/// The rendered tracker: rows in display order plus the turn control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerView {
    /// Rows in display order.
    pub rows: Vec<RowView>,
}

impl TrackerView {
    /// The row for an object.
    pub fn row(&self, id: &ObjectId) -> Option<&RowView> {
        self.rows.iter().find(|r| &r.id == id)
    }

    /// The highlighted row, if the active index lands on one.
    pub fn active_row(&self) -> Option<&RowView> {
        self.rows.iter().find(|r| r.active)
    }

    /// Label of the always-present turn control.
    pub fn next_turn_label(&self) -> &'static str {
        NEXT_TURN_LABEL
    }

    fn patch_modifier(&mut self, id: &ObjectId, value: i32) {
        if let Some(row) = self.rows.iter_mut().find(|r| &r.id == id) {
            row.modifier_field = value.to_string();
        }
    }
}

/// Build the view for a state.
pub fn render(state: &TrackerState) -> TrackerView {
    let rows = display_order(&state.entries)
        .into_iter()
        .enumerate()
        .map(|(position, entry)| RowView {
            id: entry.id.clone(),
            name: entry.name.clone(),
            initiative: entry.initiative,
            modifier_field: entry.modifier.to_string(),
            roll: entry.roll,
            active: position == state.active_index,
        })
        .collect();
    TrackerView { rows }
}

/// Parse the modifier field.
///
/// Integers are taken as-is; finite decimals are truncated toward zero;
/// anything else (blank, text, NaN, infinity) counts as 0. The result is
/// bounded by [`clamp_modifier`].
pub fn parse_modifier(raw: &str) -> i32 {
    let trimmed = raw.trim();
    let value = match trimmed.parse::<i32>() {
        Ok(value) => value,
        Err(_) => match trimmed.parse::<f64>() {
            // `as` saturates out-of-range values
            Ok(f) if f.is_finite() => f.trunc() as i32,
            _ => 0,
        },
    };
    clamp_modifier(value)
}

/// A user action on the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Track the host's current selection.
    AddSelection,
    /// The modifier field of a row changed.
    SetModifier {
        /// Row being edited.
        id: ObjectId,
        /// Raw field text.
        raw: String,
    },
    /// Roll initiative for a row.
    Roll {
        /// Row to roll for.
        id: ObjectId,
    },
    /// Pass the turn.
    NextTurn,
}

/// Wires host events and user actions to the store and keeps the view.
#[derive(Debug)]
pub struct Presenter {
    config: TrackerConfig,
    store: Option<EntryStore>,
    view: TrackerView,
    last_roll: Option<(String, InitiativeRoll)>,
}

impl Presenter {
    /// A presenter waiting for the host's readiness signal.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            store: None,
            view: TrackerView::default(),
            last_roll: None,
        }
    }

    /// Whether startup has run.
    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    /// The last rendered view.
    pub fn view(&self) -> &TrackerView {
        &self.view
    }

    /// The loaded store, once ready.
    pub fn store(&self) -> Option<&EntryStore> {
        self.store.as_ref()
    }

    /// Session configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Name and result of the most recent roll.
    pub fn last_roll(&self) -> Option<&(String, InitiativeRoll)> {
        self.last_roll.as_ref()
    }

    /// React to a host event.
    ///
    /// `Ready` loads the state, registers the add action, and renders; it is
    /// honoured once. Context actions arriving before that are dropped.
    pub fn handle_host_event<H: HostBridge + ?Sized>(
        &mut self,
        host: &mut H,
        event: HostEvent,
    ) -> TrackerResult<Option<String>> {
        match event {
            HostEvent::Ready => {
                if self.is_ready() {
                    warn!("duplicate ready signal ignored");
                    return Ok(None);
                }
                let store = EntryStore::load(&self.config, host)?;
                host.register_context_action(self.config.add_action())?;
                let count = store.state().len();
                self.store = Some(store);
                self.rerender();
                info!(entries = count, "tracker ready");
                Ok(Some(format!("Loaded {count} tracked")))
            }
            HostEvent::ContextAction(id) => {
                if !self.is_ready() {
                    warn!(action = %id, "context action before ready ignored");
                    return Ok(None);
                }
                if id != self.config.add_action_id() {
                    warn!(action = %id, "unknown context action");
                    return Ok(None);
                }
                self.dispatch(host, Action::AddSelection).map(Some)
            }
        }
    }

    /// Apply a user action and return a short status message.
    pub fn dispatch<H: HostBridge + ?Sized>(
        &mut self,
        host: &mut H,
        action: Action,
    ) -> TrackerResult<String> {
        let store = self.store.as_mut().ok_or(TrackerError::NotReady)?;
        match action {
            Action::AddSelection => {
                let selection = host.selection()?;
                let added = store.add_entries(host, &selection)?;
                self.rerender();
                Ok(match added {
                    0 => "Nothing new to add".to_string(),
                    1 => "Added 1 to initiative".to_string(),
                    n => format!("Added {n} to initiative"),
                })
            }
            Action::SetModifier { id, raw } => {
                let value = parse_modifier(&raw);
                store.set_modifier(host, &id, value)?;
                let name = entry_name(store.state(), &id);
                self.view.patch_modifier(&id, value);
                Ok(format!("{name}: modifier {value:+}"))
            }
            Action::Roll { id } => {
                let result = store.roll_for(host, &id)?;
                let name = entry_name(store.state(), &id);
                self.last_roll = Some((name.clone(), result));
                self.rerender();
                Ok(format!("{name} rolled {result}"))
            }
            Action::NextTurn => {
                let moved = store.advance_turn(host)?;
                let state = store.state();
                let message = if !moved {
                    "No one in initiative".to_string()
                } else if let Some(entry) = active_entry(&state.entries, state.active_index) {
                    format!("Turn: {}", entry.name)
                } else {
                    "Turn passed".to_string()
                };
                self.rerender();
                Ok(message)
            }
        }
    }

    fn rerender(&mut self) {
        self.view = match &self.store {
            Some(store) => render(store.state()),
            None => TrackerView::default(),
        };
    }
}

fn entry_name(state: &TrackerState, id: &ObjectId) -> String {
    state
        .entry(id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| id.to_string())
}
