//! Record services, notifications and the resource page controller.

mod notify;
mod page;
mod records;
mod resource;

pub use notify::*;
pub use page::*;
pub use records::*;
pub use resource::*;
