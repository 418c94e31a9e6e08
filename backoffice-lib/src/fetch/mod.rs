//! Resilient HTTP fetching: retry with backoff, timeouts, cancellation and
//! response-envelope normalization.

mod envelope;
mod options;
mod request;
mod retry;

pub use envelope::PayloadShape;
pub use envelope::unwrap_payload;
pub use options::RequestOptions;
pub use retry::RetryConfig;
