//! Tree event channel
//!
//! Broadcasts load outcomes to any number of observers (UI, CLI, tests).

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::{NodeId, TreeKey};

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// A child load failed; the node is left unloaded and retryable.
    NodeLoadError {
        tree: TreeKey,
        node: NodeId,
        node_id: String,
        error: String,
    },
    /// A child load installed `count` children.
    ChildrenLoaded {
        tree: TreeKey,
        node: NodeId,
        count: usize,
    },
}

/// Sending half of the event channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TreeEvents {
    tx: broadcast::Sender<TreeEvent>,
}

impl Default for TreeEvents {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl TreeEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.tx.subscribe()
    }

    /// Broadcast `event`. Having no subscribers is fine.
    pub fn emit(&self, event: TreeEvent) {
        if self.tx.send(event).is_err() {
            trace!("tree event dropped: no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{root_node, NodePayload, TreeArena};

    #[tokio::test]
    async fn test_subscribers_receive_emitted_events() {
        let events = TreeEvents::new(4);
        let mut rx = events.subscribe();
        let node = TreeArena::new(root_node(NodePayload::new("-1", "Root"), "content")).root();
        let event = TreeEvent::ChildrenLoaded {
            tree: TreeKey::new("", "content"),
            node,
            count: 2,
        };

        events.emit(event.clone());

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let node = TreeArena::new(root_node(NodePayload::new("-1", "Root"), "content")).root();
        TreeEvents::default().emit(TreeEvent::ChildrenLoaded {
            tree: TreeKey::new("", "content"),
            node,
            count: 0,
        });
    }
}
