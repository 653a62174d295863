//! Domain entity definitions.

mod api_key;
mod draft;
mod spice;

pub use api_key::ApiKey;
pub use draft::{NEW_SPICE_LABEL, SaveRequest, SpiceDraft};
pub use spice::{Spice, SpiceFields, SpiceId, StatusFlag};
