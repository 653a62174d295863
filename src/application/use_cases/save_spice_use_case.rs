//! Save use case: turns a draft into a create or a whole-document replace.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::SaveOutcome;
use crate::domain::entities::SaveRequest;
use crate::domain::errors::StoreError;
use crate::domain::ports::DocumentStorePort;

/// Writes saved drafts back to the collection.
#[derive(Clone)]
pub struct SaveSpiceUseCase {
    store: Arc<dyn DocumentStorePort>,
    collection: String,
}

impl SaveSpiceUseCase {
    /// Creates use case writing to `collection`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Executes exactly one store write for the request.
    ///
    /// # Errors
    /// Returns the store error unchanged; nothing is retried.
    pub async fn execute(&self, request: SaveRequest) -> Result<SaveOutcome, StoreError> {
        match request {
            SaveRequest::Create(fields) => {
                debug!(collection = %self.collection, name = %fields.name, "Creating spice");
                let id = self
                    .store
                    .create_document(&self.collection, &fields)
                    .await
                    .inspect_err(|e| warn!(error = %e, "Create failed"))?;
                info!(id = %id, name = %fields.name, "Spice created");
                Ok(SaveOutcome::Created(id))
            }
            SaveRequest::Replace { id, fields } => {
                debug!(collection = %self.collection, id = %id, "Replacing spice");
                self.store
                    .replace_document(&self.collection, &id, &fields)
                    .await
                    .inspect_err(|e| warn!(id = %id, error = %e, "Replace failed"))?;
                info!(id = %id, name = %fields.name, "Spice replaced");
                Ok(SaveOutcome::Replaced(id))
            }
        }
    }
}
