//! Back-office data layer
//!
//! A Rust async library for schema-driven admin tables: a resilient JSON
//! fetch client, a column resolver that picks cell presentation from
//! server-declared column types, a searchable/sortable/paginated table
//! engine, and a last-call-wins async task wrapper.

pub mod columns;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod service;
pub mod table;
pub mod task;

mod client;

pub use client::*;
pub use config::ClientConfig;
pub use error::ErrorDescriptor;
