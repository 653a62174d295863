//! Domain layer with core entities and port definitions.

/// Subscription status definitions.
pub mod connection;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use connection::SyncStatus;
pub use entities::{Spice, SpiceDraft, SpiceFields, SpiceId, StatusFlag};
pub use errors::StoreError;
pub use ports::DocumentStorePort;
