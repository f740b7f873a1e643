//! Search Front-End Library
//!
//! This library crate defines the core modules of the search front end.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The front end sits between users and two index services:
//!
//! - **`bangs`**: The shortcut table. Queries like `!w rust` redirect straight to
//!   a third-party site instead of running a search.
//! - **`config`**: Startup configuration read from `COSR_*` environment variables.
//! - **`index`**: The client side of the index services. Builds the text-index and
//!   document-store request bodies, sends them and decodes the answers.
//! - **`search`**: The query pipeline. Normalizes the query, runs the two-stage
//!   retrieval, restores the ranking, highlights hits and serves the HTTP routes.

pub mod bangs;
pub mod config;
pub mod index;
pub mod search;
