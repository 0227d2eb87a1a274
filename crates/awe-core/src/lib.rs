pub mod config;
pub mod mru;
pub mod platform;
pub mod providers;
pub mod resolver;

// Exposed for benchmarks - not part of stable API
#[doc(hidden)]
pub mod search;

mod error;
mod session;
pub(crate) mod utils;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use session::{ActivateFlags, Launcher, Outcome, SessionState};

pub use awe_types::*;
