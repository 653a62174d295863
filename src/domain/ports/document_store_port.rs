//! Remote document store port.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::entities::{Spice, SpiceFields, SpiceId};
use crate::domain::errors::StoreError;

/// A document as delivered in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Store-assigned id.
    pub id: SpiceId,
    /// Document body.
    pub fields: SpiceFields,
}

impl Document {
    /// Creates document.
    #[must_use]
    pub const fn new(id: SpiceId, fields: SpiceFields) -> Self {
        Self { id, fields }
    }

    /// Merges the id into the body.
    #[must_use]
    pub fn into_spice(self) -> Spice {
        Spice::new(self.id, self.fields)
    }
}

/// Full point-in-time listing of a collection, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    documents: Vec<Document>,
}

impl Snapshot {
    /// Creates snapshot; order is kept as given.
    #[must_use]
    pub const fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Returns documents in store order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Returns document count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Maps every document to a spice, keeping snapshot order.
    #[must_use]
    pub fn into_spices(self) -> Vec<Spice> {
        self.documents.into_iter().map(Document::into_spice).collect()
    }
}

impl FromIterator<Document> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Item delivered by a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEvent {
    /// Current contents of the collection.
    Snapshot(Snapshot),
    /// The subscription failed and delivers nothing further.
    Error(StoreError),
}

/// Teardown handle of a standing subscription.
///
/// Cancelling stops the producer task; dropping the handle cancels too.
#[derive(Debug)]
pub struct SubscriptionHandle {
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Wraps the producer task and the flag it polls.
    #[must_use]
    pub const fn new(active: Arc<AtomicBool>, task: JoinHandle<()>) -> Self {
        Self {
            active,
            task: Some(task),
        }
    }

    /// Stops delivery. Idempotent.
    pub fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Returns whether the producer is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Standing subscription to a collection.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<SnapshotEvent>,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// Pairs the event receiver with the producer handle.
    #[must_use]
    pub const fn new(
        events: mpsc::UnboundedReceiver<SnapshotEvent>,
        handle: SubscriptionHandle,
    ) -> Self {
        Self { events, handle }
    }

    /// Waits for the next event; `None` once the producer is gone.
    pub async fn recv(&mut self) -> Option<SnapshotEvent> {
        self.events.recv().await
    }

    /// Cancels the subscription.
    pub fn cancel(&mut self) {
        self.handle.cancel();
        self.events.close();
    }

    /// Returns whether events may still arrive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }
}

/// Port for the remote document collection backing the spice list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Opens a live subscription. The first event reflects the current
    /// contents; later events follow every change.
    ///
    /// # Errors
    /// Returns `StoreError` if the subscription cannot be started.
    fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError>;

    /// Creates a document and returns the id the store assigned.
    async fn create_document(
        &self,
        collection: &str,
        fields: &SpiceFields,
    ) -> Result<SpiceId, StoreError>;

    /// Overwrites the whole document at `id`.
    async fn replace_document(
        &self,
        collection: &str,
        id: &SpiceId,
        fields: &SpiceFields,
    ) -> Result<(), StoreError>;
}
