use super::{ContextAction, HostBridge, HostObject, Layer, Metadata};
use crate::entry::ObjectId;
use crate::error::{HostError, HostResult};

/// A host that keeps everything in memory.
///
/// Useful for embedding the tracker in another program and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    objects: Vec<HostObject>,
    selection: Vec<ObjectId>,
    metadata: Metadata,
    actions: Vec<ContextAction>,
    offline: bool,
    writes: usize,
}

impl MemoryHost {
    /// An empty host with nothing on the canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an object on the canvas.
    pub fn with_object(mut self, id: &str, name: Option<&str>, layer: Layer) -> Self {
        self.objects.push(HostObject {
            id: ObjectId::new(id),
            name: name.map(str::to_string),
            layer,
        });
        self
    }

    /// Replace the current selection. Ids need not exist on the canvas.
    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = ids.into_iter().map(ObjectId::new).collect();
    }

    /// Make every subsequent call fail as if the host went away.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Registered context actions, in registration order.
    pub fn actions(&self) -> &[ContextAction] {
        &self.actions
    }

    /// The raw metadata document.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the metadata document, standing in for another client.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// How many metadata writes have been accepted.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn check_online(&self) -> HostResult<()> {
        if self.offline {
            Err(HostError::Unavailable("memory host is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl HostBridge for MemoryHost {
    fn selection(&self) -> HostResult<Vec<ObjectId>> {
        self.check_online()?;
        Ok(self.selection.clone())
    }

    fn resolve_object(&self, id: &ObjectId) -> HostResult<Option<HostObject>> {
        self.check_online()?;
        Ok(self.objects.iter().find(|o| &o.id == id).cloned())
    }

    fn document_metadata(&self) -> HostResult<Metadata> {
        self.check_online()?;
        Ok(self.metadata.clone())
    }

    fn set_document_metadata(&mut self, update: Metadata) -> HostResult<()> {
        self.check_online()?;
        self.metadata.extend(update);
        self.writes += 1;
        Ok(())
    }

    fn register_context_action(&mut self, action: ContextAction) -> HostResult<()> {
        self.check_online()?;
        self.actions.retain(|a| a.id != action.id);
        self.actions.push(action);
        Ok(())
    }
}
