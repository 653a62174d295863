//! Color theme of the terminal shell.

/// Color conversion.
pub mod adapter;
mod service;

pub use service::Theme;
