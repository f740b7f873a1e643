//! Bang Redirect Module
//!
//! Supports a small subset of https://duckduckgo.com/bang: a query term such as
//! `!w` short-circuits the local search and redirects to an external site.
//!
//! ## Submodules
//! - **`table`**: The immutable token → language → URL template mapping, loaded at startup.
//! - **`detector`**: Finds the first known bang in a query and expands its template.

pub mod detector;
pub mod table;

pub use detector::detect_bang;
pub use table::{BangEntry, BangTable};
