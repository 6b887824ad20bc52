//! Domain models for the fertility engine.

mod factors;
mod interaction;
mod profile;
mod result;

pub use factors::*;
pub use interaction::*;
pub use profile::*;
pub use result::*;
