//! Table engine: search, sort, pagination and selection over schema-described rows.

mod engine;
mod pager;
mod state;

pub use engine::*;
pub use pager::*;
pub use state::*;
