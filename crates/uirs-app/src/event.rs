//! Runtime events delivered to observers of a mounted application
//!
//! Observers registered through `MountedApp::subscribe()` are called
//! synchronously after each mount or update cycle, once the presentation tree
//! reflects the new state.

use serde::Serialize;
use uirs_core::NodeId;

/// Something that happened to a mounted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RuntimeEvent {
    /// Initial render was reconciled into the container
    Mounted {
        container: NodeId,
        root: Option<NodeId>,
    },

    /// An event was processed and the tree was reconciled again
    Updated {
        /// Number of completed update cycles, starting at 1
        generation: u64,
        root: Option<NodeId>,
    },
}

impl RuntimeEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Mounted { .. } => "mounted",
            Self::Updated { .. } => "updated",
        }
    }

    /// Root presentation node after the cycle, if any.
    pub fn root(&self) -> Option<NodeId> {
        match self {
            Self::Mounted { root, .. } | Self::Updated { root, .. } => *root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_event_type_labels() {
        let event = RuntimeEvent::Mounted {
            container: NodeId::from_raw(1),
            root: None,
        };
        assert_eq!(event.event_type(), "mounted");

        let event = RuntimeEvent::Updated {
            generation: 3,
            root: Some(NodeId::from_raw(4)),
        };
        assert_eq!(event.event_type(), "updated");
        assert_eq!(event.root(), Some(NodeId::from_raw(4)));
    }

    #[test]
    fn test_runtime_event_serializes_tagged() {
        let event = RuntimeEvent::Updated {
            generation: 2,
            root: Some(NodeId::from_raw(7)),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"updated","generation":2,"root":7}"#);
    }
}
