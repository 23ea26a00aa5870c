//! Configuration for a tracker session.

use crate::host::{ActionFilter, ContextAction, Layer, ObjectPredicate};

/// Metadata key the tracker stores its state under.
pub const DEFAULT_NAMESPACE: &str = "initiative-mod-tracker";

/// Configuration for a tracker session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Metadata key for the persisted state; also prefixes action ids.
    pub namespace: String,
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            seed: None,
        }
    }
}

impl TrackerConfig {
    /// Set the metadata namespace. Blank names keep the current one.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if !namespace.trim().is_empty() {
            self.namespace = namespace.trim().to_string();
        }
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Id of the "Add to Initiative" context action.
    pub fn add_action_id(&self) -> String {
        format!("{}.add", self.namespace)
    }

    /// The "Add to Initiative" context action, offered only when every
    /// selected object is on the character layer.
    pub fn add_action(&self) -> ContextAction {
        ContextAction {
            id: self.add_action_id(),
            icon: "+".to_string(),
            label: "Add to Initiative".to_string(),
            filter: ActionFilter {
                every: vec![ObjectPredicate::OnLayer(Layer::Character)],
            },
        }
    }
}
