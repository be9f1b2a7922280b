//! Application layer: dispatcher, result cache and derived queries
//!
//! This layer drives the tool through the I/O boundary traits.

pub mod cache;
pub mod client;
pub mod error;
pub mod error_ext;
pub mod queries;

pub use cache::ResultCache;
pub use client::P4Client;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
