//! The interface the tracker needs from its host application.
//!
//! A host owns the canvas: it knows what the user has selected, can look up
//! objects by id, keeps a per-document key-value metadata store, and offers
//! context actions on selected objects. Concrete hosts live outside this
//! crate; [`MemoryHost`] is an in-process one.

mod memory;

pub use memory::MemoryHost;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::ObjectId;
use crate::error::HostResult;

/// Document metadata: top-level keys are owned by individual extensions.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// The canvas layer an object lives on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    /// Map background.
    Map,
    /// Terrain and props.
    Prop,
    /// Player characters and creatures.
    Character,
    /// Drawings and annotations.
    Drawing,
    /// Any layer this crate does not know about.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => write!(f, "MAP"),
            Self::Prop => write!(f, "PROP"),
            Self::Character => write!(f, "CHARACTER"),
            Self::Drawing => write!(f, "DRAWING"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// What the host knows about one object on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostObject {
    /// The object's identifier.
    pub id: ObjectId,
    /// Display name, when the object has one.
    #[serde(default)]
    pub name: Option<String>,
    /// The layer it is placed on.
    pub layer: Layer,
}

/// A condition on one object, used to decide whether an action is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPredicate {
    /// The object is on the given layer.
    OnLayer(Layer),
}

impl ObjectPredicate {
    /// Whether the object satisfies this predicate.
    pub fn matches(&self, object: &HostObject) -> bool {
        match self {
            Self::OnLayer(layer) => &object.layer == layer,
        }
    }
}

/// Filter deciding when a context action is visible for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionFilter {
    /// Every selected object must satisfy all of these.
    pub every: Vec<ObjectPredicate>,
}

impl ActionFilter {
    /// Whether the action applies to this selection. An empty selection
    /// never matches.
    pub fn matches(&self, selection: &[HostObject]) -> bool {
        !selection.is_empty()
            && selection
                .iter()
                .all(|obj| self.every.iter().all(|p| p.matches(obj)))
    }
}

/// A user-invokable action registered with the host (e.g. a right-click entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAction {
    /// Unique action id; echoed back in [`HostEvent::ContextAction`].
    pub id: String,
    /// Short icon glyph.
    pub icon: String,
    /// Menu label.
    pub label: String,
    /// When the action is offered.
    pub filter: ActionFilter,
}

/// Something the host tells the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host finished initializing. Fired once.
    Ready,
    /// The user invoked a registered context action.
    ContextAction(String),
}

/// Capabilities the tracker consumes from its host.
///
/// Every call runs to completion before the next user event is handled.
pub trait HostBridge {
    /// Identifiers of the currently selected objects.
    fn selection(&self) -> HostResult<Vec<ObjectId>>;

    /// Look up an object; `None` if the host does not know it.
    fn resolve_object(&self, id: &ObjectId) -> HostResult<Option<HostObject>>;

    /// A copy of the shared per-document metadata.
    fn document_metadata(&self) -> HostResult<Metadata>;

    /// Replace the given top-level keys in the document metadata. Keys not
    /// present in `update` are left alone.
    fn set_document_metadata(&mut self, update: Metadata) -> HostResult<()>;

    /// Offer a context action to the user.
    fn register_context_action(&mut self, action: ContextAction) -> HostResult<()>;
}
