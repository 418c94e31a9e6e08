//! Error types

mod descriptor;

pub use descriptor::*;
