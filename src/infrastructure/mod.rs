//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Cloud Firestore document store.
pub mod firestore;
/// In-process document store.
pub mod memory_store;

pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use firestore::FirestoreClient;
pub use memory_store::InMemoryDocumentStore;
