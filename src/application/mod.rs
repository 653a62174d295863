//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Use case implementations.
pub mod use_cases;

pub use dto::SaveOutcome;
pub use use_cases::{SaveSpiceUseCase, WatchSpicesUseCase};
