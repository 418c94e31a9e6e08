//! Typed models

mod column;
mod row;
mod value;

pub use column::*;
pub use row::*;
pub use value::*;
