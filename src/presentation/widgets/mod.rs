mod input;
mod spice_card;
mod status_bar;

pub use input::TextInput;
pub use spice_card::SpiceCard;
pub use status_bar::{StatusBar, StatusLevel};
