//! Cloud Firestore adapter.

mod client;
mod dto;
mod watcher;

pub use client::FirestoreClient;
pub use watcher::{SnapshotSource, spawn_watcher};
