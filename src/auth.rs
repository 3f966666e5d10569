//! Consumer credentials shared read-only by every signed call.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
