//! Subscription use case for the live spice list.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::Spice;
use crate::domain::errors::StoreError;
use crate::domain::ports::{DocumentStorePort, Snapshot, Subscription};

/// Opens the standing subscription backing the list screen.
#[derive(Clone)]
pub struct WatchSpicesUseCase {
    store: Arc<dyn DocumentStorePort>,
    collection: String,
}

impl WatchSpicesUseCase {
    /// Creates use case watching `collection`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Returns watched collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// # Errors
    /// Returns `StoreError` if the store refuses the subscription.
    pub fn execute(&self) -> Result<Subscription, StoreError> {
        info!(collection = %self.collection, "Subscribing to collection");
        self.store.subscribe(&self.collection)
    }

    /// Maps a snapshot to the list state that replaces the current one.
    #[must_use]
    pub fn list_from_snapshot(snapshot: Snapshot) -> Vec<Spice> {
        debug!(count = snapshot.len(), "Snapshot received");
        snapshot.into_spices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{SpiceFields, SpiceId, StatusFlag};
    use crate::domain::ports::Document;
    use crate::domain::ports::mocks::MockDocumentStorePort;

    #[test]
    fn test_list_matches_snapshot_exactly() {
        let snapshot = Snapshot::new(vec![
            Document::new(
                SpiceId::new("b2").unwrap(),
                SpiceFields::named("Basil").with_note("dried"),
            ),
            Document::new(
                SpiceId::new("a1").unwrap(),
                SpiceFields::named("Cumin").with_flag(StatusFlag::RunningLow, true),
            ),
        ]);

        let list = WatchSpicesUseCase::list_from_snapshot(snapshot.clone());

        assert_eq!(list.len(), snapshot.len());
        for (spice, doc) in list.iter().zip(snapshot.documents()) {
            assert_eq!(spice.id(), &doc.id);
            assert_eq!(spice.fields(), &doc.fields);
        }
    }

    #[test]
    fn test_subscribe_failure_propagates() {
        let mut store = MockDocumentStorePort::new();
        store
            .expect_subscribe()
            .withf(|collection| collection == "spices")
            .times(1)
            .returning(|_| Err(StoreError::rejected("missing project")));

        let use_case = WatchSpicesUseCase::new(Arc::new(store), "spices");
        assert!(use_case.execute().is_err());
    }
}
