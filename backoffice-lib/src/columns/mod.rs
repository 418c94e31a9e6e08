//! Column resolution: declared column types to presentation rules.

mod cell;
mod kind;
mod locale;
mod resolver;

pub use cell::*;
pub use kind::ColumnKind;
pub use locale::Locale;
pub use resolver::*;
