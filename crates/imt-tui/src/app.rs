//! Top-level application state: the scene host, the presenter, and the
//! terminal-side focus and input state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use imt_core::{ObjectId, TrackerConfig, TrackerResult};
use imt_scene::SceneHost;

use crate::presenter::{Action, Presenter};

/// Which panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// The host scene: items and selection.
    Scene,
    /// The initiative list.
    Tracker,
}

impl Panel {
    fn other(self) -> Self {
        match self {
            Self::Scene => Self::Tracker,
            Self::Tracker => Self::Scene,
        }
    }
}

/// Whether keys navigate or go into a text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Vim-like navigation and single-key commands.
    Browse,
    /// Typing into a row's modifier field.
    EditModifier {
        /// Row being edited.
        id: ObjectId,
        /// Field contents so far.
        buffer: String,
    },
}

/// A line shown in the status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Whether to show it as an error.
    pub is_error: bool,
}

/// Main application state for the TUI.
pub struct TuiApp {
    /// The scene acting as host.
    pub host: SceneHost,
    /// Tracker presenter.
    pub presenter: Presenter,
    /// Focused panel.
    pub focus: Panel,
    /// Cursor in the scene item list.
    pub scene_cursor: usize,
    /// Cursor in the tracker rows (display order).
    pub tracker_cursor: usize,
    /// Current input mode.
    pub mode: InputMode,
    /// Last status message.
    pub message: Option<StatusMessage>,
    /// Whether to show the help popup.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl TuiApp {
    /// Create an app around an opened scene. Nothing is loaded until
    /// [`TuiApp::start`] delivers the host's readiness signal.
    pub fn new(host: SceneHost, config: TrackerConfig) -> Self {
        Self {
            host,
            presenter: Presenter::new(config),
            focus: Panel::Scene,
            scene_cursor: 0,
            tracker_cursor: 0,
            mode: InputMode::Browse,
            message: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Drain pending host events (the readiness signal) into the presenter.
    pub fn start(&mut self) -> TrackerResult<()> {
        while let Some(event) = self.host.poll_ready() {
            let result = self.presenter.handle_host_event(&mut self.host, event);
            self.report(result.map(|m| m.unwrap_or_default()))?;
        }
        Ok(())
    }

    /// Whether a text field has focus.
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, InputMode::EditModifier { .. })
    }

    /// Id of the tracker row under the cursor.
    pub fn focused_row(&self) -> Option<&ObjectId> {
        self.presenter
            .view()
            .rows
            .get(self.tracker_cursor)
            .map(|r| &r.id)
    }

    /// Handle a key press. Only unrecoverable host faults are returned.
    pub fn handle_key(&mut self, key: KeyEvent) -> TrackerResult<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.is_editing() {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Esc if self.show_help => self.show_help = false,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.other(),
            KeyCode::Char('n') => {
                let result = self.presenter.dispatch(&mut self.host, Action::NextTurn);
                self.report(result)?;
            }
            KeyCode::Char('a') => self.invoke_add()?,
            _ => match self.focus {
                Panel::Scene => self.handle_scene_key(key),
                Panel::Tracker => self.handle_tracker_key(key)?,
            },
        }
        Ok(())
    }

    fn handle_scene_key(&mut self, key: KeyEvent) {
        let len = self.host.items().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.scene_cursor + 1 < len {
                    self.scene_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scene_cursor = self.scene_cursor.saturating_sub(1);
            }
            KeyCode::Char('g') => self.scene_cursor = 0,
            KeyCode::Char('G') => self.scene_cursor = len.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(item) = self.host.items().get(self.scene_cursor) {
                    let id = item.id.clone();
                    if let Err(e) = self.host.toggle_selection(&id) {
                        self.set_error(e.to_string());
                    }
                }
            }
            KeyCode::Char('c') => self.host.clear_selection(),
            _ => {}
        }
    }

    fn handle_tracker_key(&mut self, key: KeyEvent) -> TrackerResult<()> {
        let len = self.presenter.view().rows.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.tracker_cursor + 1 < len {
                    self.tracker_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.tracker_cursor = self.tracker_cursor.saturating_sub(1);
            }
            KeyCode::Char('g') => self.tracker_cursor = 0,
            KeyCode::Char('G') => self.tracker_cursor = len.saturating_sub(1),
            KeyCode::Char('r') => {
                if let Some(id) = self.focused_row().cloned() {
                    let result = self.presenter.dispatch(&mut self.host, Action::Roll { id });
                    self.report(result)?;
                }
            }
            KeyCode::Char('m') | KeyCode::Enter => {
                if let Some(row) = self.presenter.view().rows.get(self.tracker_cursor) {
                    self.mode = InputMode::EditModifier {
                        id: row.id.clone(),
                        buffer: row.modifier_field.clone(),
                    };
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> TrackerResult<()> {
        let InputMode::EditModifier { id, buffer } = &mut self.mode else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.mode = InputMode::Browse,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if buffer.len() < 12 => buffer.push(c),
            KeyCode::Enter => {
                let action = Action::SetModifier {
                    id: id.clone(),
                    raw: std::mem::take(buffer),
                };
                self.mode = InputMode::Browse;
                let result = self.presenter.dispatch(&mut self.host, action);
                self.report(result)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Invoke the "Add to Initiative" context action through the host.
    fn invoke_add(&mut self) -> TrackerResult<()> {
        let action_id = self.presenter.config().add_action_id();
        match self.host.invoke(&action_id) {
            Some(event) => {
                let result = self.presenter.handle_host_event(&mut self.host, event);
                self.report(result.map(|m| m.unwrap_or_default()))?;
            }
            None => self.set_error("Select one or more character pieces first".to_string()),
        }
        Ok(())
    }

    /// Show an outcome in the status line; pass fatal errors through.
    fn report(&mut self, result: TrackerResult<String>) -> TrackerResult<()> {
        match result {
            Ok(text) if text.is_empty() => {}
            Ok(text) => {
                debug!(%text, "status");
                self.message = Some(StatusMessage {
                    text,
                    is_error: false,
                });
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => self.set_error(e.to_string()),
        }
        self.clamp_tracker_cursor();
        Ok(())
    }

    fn set_error(&mut self, text: String) {
        self.message = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    fn clamp_tracker_cursor(&mut self) {
        let len = self.presenter.view().rows.len();
        self.tracker_cursor = self.tracker_cursor.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crossterm::event::KeyEvent;
    use tempfile::TempDir;

    fn scene() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(
            &path,
            r#"{
    "name": "Bridge",
    "items": [
        { "id": "kn", "name": "Knight", "layer": "CHARACTER" },
        { "id": "tr", "name": "Troll", "layer": "CHARACTER" },
        { "id": "cart", "name": "Cart", "layer": "PROP" }
    ]
}"#,
        )
        .unwrap();
        (dir, path)
    }

    fn open_app(path: &Path) -> TuiApp {
        let host = SceneHost::open(path).unwrap();
        let mut app = TuiApp::new(host, TrackerConfig::default().with_seed(5));
        app.start().unwrap();
        app
    }

    fn press(app: &mut TuiApp, code: KeyCode) {
        app.handle_key(KeyEvent::from(code)).unwrap();
    }

    fn type_str(app: &mut TuiApp, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_both_characters(app: &mut TuiApp) {
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Char('j'));
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Char('a'));
    }

    #[test]
    fn start_loads_and_registers() {
        let (_dir, path) = scene();
        let app = open_app(&path);
        assert!(app.presenter.is_ready());
        assert_eq!(app.message.as_ref().unwrap().text, "Loaded 0 tracked");
    }

    #[test]
    fn select_and_add() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        add_both_characters(&mut app);

        let rows = &app.presenter.view().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Knight");
        assert_eq!(app.message.as_ref().unwrap().text, "Added 2 to initiative");
    }

    #[test]
    fn add_leaves_selection_alone() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        add_both_characters(&mut app);
        assert_eq!(app.host.selected_items().len(), 2);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.message.as_ref().unwrap().text, "Nothing new to add");
        assert_eq!(app.presenter.view().rows.len(), 2);
    }

    #[test]
    fn oversized_modifier_rolls_without_overflow() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        add_both_characters(&mut app);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "2147483647");
        press(&mut app, KeyCode::Enter);

        let knight = ObjectId::new("kn");
        let modifier = app.presenter.store().unwrap().state().entry(&knight).unwrap().modifier;
        assert_eq!(modifier, imt_core::MAX_MODIFIER);

        press(&mut app, KeyCode::Char('r'));
        let row = app.presenter.view().row(&knight).unwrap();
        assert_eq!(row.initiative, row.roll.unwrap() + modifier);
    }

    #[test]
    fn add_refused_with_prop_selected() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('a'));

        assert!(app.presenter.view().rows.is_empty());
        assert!(app.message.as_ref().unwrap().is_error);
    }

    #[test]
    fn edit_modifier_then_roll() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        add_both_characters(&mut app);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Panel::Tracker);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('m'));
        assert!(app.is_editing());
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "4");
        press(&mut app, KeyCode::Enter);
        assert!(!app.is_editing());

        let troll = ObjectId::new("tr");
        let store = app.presenter.store().unwrap();
        assert_eq!(store.state().entry(&troll).unwrap().modifier, 4);
        // not re-sorted yet
        assert_eq!(app.presenter.view().rows[1].name, "Troll");

        press(&mut app, KeyCode::Char('r'));
        let row = app.presenter.view().row(&troll).unwrap();
        let roll = row.roll.unwrap();
        assert_eq!(row.initiative, roll + 4);
        assert_eq!(app.presenter.view().rows[0].name, "Troll");
    }

    #[test]
    fn escape_cancels_edit() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        add_both_characters(&mut app);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('m'));
        type_str(&mut app, "9");
        press(&mut app, KeyCode::Esc);

        let store = app.presenter.store().unwrap();
        assert_eq!(store.state().entries[0].modifier, 0);
        assert!(!app.is_editing());
    }

    #[test]
    fn typing_q_while_editing_does_not_quit() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        add_both_characters(&mut app);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "q");
        assert!(!app.should_quit);
    }

    #[test]
    fn next_turn_key() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.message.as_ref().unwrap().text, "No one in initiative");

        add_both_characters(&mut app);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.presenter.view().active_row().unwrap().name, "Troll");
    }

    #[test]
    fn state_survives_restart() {
        let (_dir, path) = scene();
        let mut first = open_app(&path);
        add_both_characters(&mut first);
        press(&mut first, KeyCode::Char('n'));

        let second = open_app(&path);
        let view = second.presenter.view();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.active_row().unwrap().name, "Troll");
    }

    #[test]
    fn quit_keys() {
        let (_dir, path) = scene();
        let mut app = open_app(&path);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app2 = open_app(&path);
        app2.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(app2.should_quit);
    }
}
