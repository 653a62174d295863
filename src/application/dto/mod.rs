//! Data transfer objects for the application layer.

mod save_dto;

pub use save_dto::SaveOutcome;
