//! Shared agent state feed.
//!
//! One writer publishes whole snapshots; any number of subscriptions read
//! the latest one. Readers never write back.

use std::sync::Arc;

use tokio::sync::watch;

use supplynet_core::{AgentState, CoreError};

/// Writer side of the state feed.
#[derive(Debug, Clone)]
pub struct StateFeed {
    tx: Arc<watch::Sender<Arc<AgentState>>>,
}

impl StateFeed {
    /// Create a feed holding an empty (not started) state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(AgentState::default()));
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current snapshot. Succeeds with or without subscribers.
    pub fn publish(&self, state: AgentState) {
        self.tx.send_replace(Arc::new(state));
    }

    /// Subscribe to snapshots. The current one counts as already seen.
    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<AgentState> {
        self.tx.borrow().clone()
    }
}

impl Default for StateFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader side of the state feed.
#[derive(Debug, Clone)]
pub struct StateSubscription {
    rx: watch::Receiver<Arc<AgentState>>,
}

impl StateSubscription {
    /// Latest snapshot, without marking it seen.
    pub fn current(&self) -> Arc<AgentState> {
        self.rx.borrow().clone()
    }

    /// The latest snapshot if one was published since the last call.
    pub fn take_update(&mut self) -> Option<Arc<AgentState>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next snapshot.
    pub async fn changed(&mut self) -> Result<Arc<AgentState>, CoreError> {
        self.rx.changed().await.map_err(|_| CoreError::FeedClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn started(sku: &str) -> AgentState {
        AgentState::from_value(json!({ "workflow_state": { "product_sku": sku } }))
    }

    #[test]
    fn test_starts_empty() {
        let feed = StateFeed::new();
        let subscription = feed.subscribe();
        assert!(!subscription.current().is_started());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let feed = StateFeed::new();
        feed.publish(started("A"));
        assert!(feed.current().is_started());
    }

    #[test]
    fn test_take_update_once() {
        let feed = StateFeed::new();
        let mut subscription = feed.subscribe();
        assert!(subscription.take_update().is_none());

        feed.publish(started("A"));
        let update = subscription.take_update().unwrap();
        assert!(update.is_started());
        assert!(subscription.take_update().is_none());
    }

    #[test]
    fn test_subscribers_see_latest() {
        let feed = StateFeed::new();
        let first = feed.subscribe();
        let second = feed.subscribe();
        feed.publish(started("A"));
        feed.publish(started("B"));

        for subscription in [first, second] {
            let sku = subscription
                .current()
                .workflow_state
                .as_ref()
                .and_then(|wf| wf.product_sku.clone());
            assert_eq!(sku.as_deref(), Some("B"));
        }
    }

    #[tokio::test]
    async fn test_changed_wakes_subscriber() {
        let feed = StateFeed::new();
        let mut subscription = feed.subscribe();

        let writer = feed.clone();
        tokio::spawn(async move {
            writer.publish(started("A"));
        });

        let state = subscription.changed().await.unwrap();
        assert!(state.is_started());
    }

    #[tokio::test]
    async fn test_changed_errors_when_writer_dropped() {
        let feed = StateFeed::new();
        let mut subscription = feed.subscribe();
        drop(feed);
        assert!(matches!(
            subscription.changed().await,
            Err(CoreError::FeedClosed)
        ));
    }
}
