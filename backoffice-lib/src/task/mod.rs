//! Async task wrapper with loading state and stale-call suppression.

mod runner;
mod state;

pub use runner::*;
pub use state::*;
