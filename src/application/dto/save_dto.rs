//! Save DTOs.

use crate::domain::entities::SpiceId;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new document was created with this id.
    Created(SpiceId),
    /// The document at this id was overwritten.
    Replaced(SpiceId),
}

impl SaveOutcome {
    /// Id of the written document.
    #[must_use]
    pub const fn id(&self) -> &SpiceId {
        match self {
            Self::Created(id) | Self::Replaced(id) => id,
        }
    }
}

impl std::fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created(id) => write!(f, "created {id}"),
            Self::Replaced(id) => write!(f, "replaced {id}"),
        }
    }
}
