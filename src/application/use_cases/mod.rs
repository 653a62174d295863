//! Use case implementations.

mod save_spice_use_case;
mod watch_spices_use_case;

pub use save_spice_use_case::SaveSpiceUseCase;
pub use watch_spices_use_case::WatchSpicesUseCase;
