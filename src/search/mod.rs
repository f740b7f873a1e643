//! Search Service Module
//!
//! The request pipeline of the front end: from a user query to display-ready hits.
//!
//! ## Overview
//! Each request runs one sequential pipeline:
//! normalize → bang check → text index → document store → join & highlight → timing.
//! The two service calls are strictly sequential since the document-store
//! lookup needs the IDs ranked by the text index.
//!
//! ## Submodules
//! - **`errors`**: `SearchError`, a failed request.
//! - **`handlers`**: HTTP handlers for the Axum web server.
//! - **`joiner`**: Re-joins stored documents onto the text ranking and highlights them.
//! - **`links`**: Canonical, next and previous page links.
//! - **`pipeline`**: `Pipeline`, the shared search context and entry point.
//! - **`query`**: Query term limit.
//! - **`types`**: Requests, hits, results and timings.

pub mod errors;
pub mod handlers;
pub mod joiner;
pub mod links;
pub mod pipeline;
pub mod query;
pub mod types;

pub use errors::SearchError;
pub use pipeline::Pipeline;
pub use types::{Hit, SearchRequest, SearchResult, TimingBreakdown};
