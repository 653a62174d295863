mod document_store_port;

pub use document_store_port::{
    Document, DocumentStorePort, Snapshot, SnapshotEvent, Subscription, SubscriptionHandle,
};
