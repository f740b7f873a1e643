//! Index Service Module
//!
//! Everything needed to talk to the two remote search services.
//!
//! ## Two-stage retrieval
//! 1. The **text index** ranks documents for the query and returns one page of IDs.
//! 2. The **document store** returns title, summary and URL for those IDs.
//!
//! ## Submodules
//! - **`builder`**: Typed query bodies for both stages.
//! - **`client`**: HTTP handle with per-request timeout and wall-time measurement.
//! - **`errors`**: `IndexError`, the failure kinds of a service call.
//! - **`protocol`**: Endpoints and strongly-typed response schemas.

pub mod builder;
pub mod client;
pub mod errors;
pub mod protocol;

pub use client::{IndexClient, Timed};
pub use errors::IndexError;

#[cfg(test)]
mod tests;
