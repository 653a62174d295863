//! In-process document store with live snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{SpiceFields, SpiceId};
use crate::domain::errors::StoreError;
use crate::domain::ports::{
    Document, DocumentStorePort, Snapshot, SnapshotEvent, Subscription, SubscriptionHandle,
};

/// Keeps one collection in memory, in insertion order.
///
/// Collections other than the one it was built for are rejected.
pub struct InMemoryDocumentStore {
    collection: String,
    state: watch::Sender<Snapshot>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store for `collection`.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self::with_documents(collection, Vec::new())
    }

    /// Creates a store pre-filled with `documents`.
    #[must_use]
    pub fn with_documents(collection: impl Into<String>, documents: Vec<Document>) -> Self {
        let (state, _) = watch::channel(Snapshot::new(documents));
        Self {
            collection: collection.into(),
            state,
        }
    }

    /// Current contents.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    fn check_collection(&self, collection: &str) -> Result<(), StoreError> {
        if collection == self.collection {
            Ok(())
        } else {
            Err(StoreError::not_found(collection))
        }
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError> {
        self.check_collection(collection)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicBool::new(true));
        let mut state_rx = self.state.subscribe();
        let running = active.clone();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = state_rx.borrow_and_update().clone();
                if event_tx.send(SnapshotEvent::Snapshot(snapshot)).is_err() {
                    break;
                }
                if state_rx.changed().await.is_err() {
                    break;
                }
            }
            running.store(false, Ordering::SeqCst);
        });

        Ok(Subscription::new(
            event_rx,
            SubscriptionHandle::new(active, task),
        ))
    }

    async fn create_document(
        &self,
        collection: &str,
        fields: &SpiceFields,
    ) -> Result<SpiceId, StoreError> {
        self.check_collection(collection)?;

        let id = SpiceId::new(Uuid::new_v4().simple().to_string())
            .ok_or_else(|| StoreError::unexpected("generated an empty id"))?;
        let document = Document::new(id.clone(), fields.clone());

        self.state.send_modify(|snapshot| {
            let mut documents = snapshot.documents().to_vec();
            documents.push(document);
            *snapshot = Snapshot::new(documents);
        });

        debug!(id = %id, "Document created in memory");
        Ok(id)
    }

    async fn replace_document(
        &self,
        collection: &str,
        id: &SpiceId,
        fields: &SpiceFields,
    ) -> Result<(), StoreError> {
        self.check_collection(collection)?;

        self.state.send_modify(|snapshot| {
            let mut documents = snapshot.documents().to_vec();
            match documents.iter_mut().find(|doc| &doc.id == id) {
                Some(doc) => doc.fields = fields.clone(),
                None => documents.push(Document::new(id.clone(), fields.clone())),
            }
            *snapshot = Snapshot::new(documents);
        });

        debug!(id = %id, "Document replaced in memory");
        Ok(())
    }
}
