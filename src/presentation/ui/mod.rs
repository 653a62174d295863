//! UI screens.

mod app;
mod backend;
mod edit_modal;
mod list_screen;

pub use app::App;
pub use edit_modal::{EditAction, EditFocus, EditModal};
pub use list_screen::{ListKeyResult, ListScreen, ListScreenState};
