//! A [`HostBridge`] backed by a scene file.
//!
//! The canvas items are read once when the scene is opened. Metadata is read
//! from disk on every request and written back on every update, so other
//! processes sharing the file see each save and keep their own keys.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use imt_core::{
    ContextAction, HostBridge, HostEvent, HostObject, HostResult, Metadata, ObjectId,
};

use crate::document::SceneDocument;
use crate::error::{SceneError, SceneResult};

/// A scene file acting as the host application.
#[derive(Debug)]
pub struct SceneHost {
    path: PathBuf,
    document: SceneDocument,
    selection: Vec<ObjectId>,
    actions: Vec<ContextAction>,
    ready_sent: bool,
}

impl SceneHost {
    /// Open an existing scene file.
    pub fn open(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref().to_path_buf();
        let document = SceneDocument::read(&path)?;
        debug!(path = %path.display(), items = document.items.len(), "opened scene");
        Ok(Self {
            path,
            document,
            selection: Vec::new(),
            actions: Vec::new(),
            ready_sent: false,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scene title.
    pub fn name(&self) -> &str {
        &self.document.name
    }

    /// Pieces on the canvas.
    pub fn items(&self) -> &[HostObject] {
        &self.document.items
    }

    /// The readiness signal. Returns [`HostEvent::Ready`] on the first call
    /// and `None` afterwards.
    pub fn poll_ready(&mut self) -> Option<HostEvent> {
        if self.ready_sent {
            return None;
        }
        self.ready_sent = true;
        Some(HostEvent::Ready)
    }

    /// Whether an item is part of the selection.
    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selection.contains(id)
    }

    /// Add an item to the selection, or remove it if already selected.
    pub fn toggle_selection(&mut self, id: &ObjectId) -> SceneResult<()> {
        if !self.document.items.iter().any(|i| &i.id == id) {
            return Err(SceneError::UnknownItem(id.clone()));
        }
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id.clone());
        }
        Ok(())
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The selected items, in selection order.
    pub fn selected_items(&self) -> Vec<HostObject> {
        self.selection
            .iter()
            .filter_map(|id| self.document.items.iter().find(|i| &i.id == id))
            .cloned()
            .collect()
    }

    /// Registered actions whose filter accepts the current selection.
    pub fn available_actions(&self) -> Vec<&ContextAction> {
        let selected = self.selected_items();
        self.actions
            .iter()
            .filter(|a| a.filter.matches(&selected))
            .collect()
    }

    /// Invoke a context action. Returns the event to deliver to the
    /// extension, or `None` when the action is not offered for the current
    /// selection.
    pub fn invoke(&self, action_id: &str) -> Option<HostEvent> {
        let offered = self
            .available_actions()
            .iter()
            .any(|a| a.id == action_id);
        if offered {
            Some(HostEvent::ContextAction(action_id.to_string()))
        } else {
            warn!(action = action_id, "action not available for selection");
            None
        }
    }
}

impl HostBridge for SceneHost {
    fn selection(&self) -> HostResult<Vec<ObjectId>> {
        Ok(self.selection.clone())
    }

    fn resolve_object(&self, id: &ObjectId) -> HostResult<Option<HostObject>> {
        Ok(self.document.items.iter().find(|i| &i.id == id).cloned())
    }

    fn document_metadata(&self) -> HostResult<Metadata> {
        let on_disk = SceneDocument::read(&self.path)?;
        Ok(on_disk.metadata)
    }

    fn set_document_metadata(&mut self, update: Metadata) -> HostResult<()> {
        // merge into what is on disk now so other writers keep their keys
        let mut on_disk = SceneDocument::read(&self.path)?;
        on_disk.metadata.extend(update);
        on_disk.write(&self.path)?;
        self.document.metadata = on_disk.metadata;
        debug!(path = %self.path.display(), "scene metadata written");
        Ok(())
    }

    fn register_context_action(&mut self, action: ContextAction) -> HostResult<()> {
        debug!(action = %action.id, label = %action.label, "registered context action");
        self.actions.retain(|a| a.id != action.id);
        self.actions.push(action);
        Ok(())
    }
}
