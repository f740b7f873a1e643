//! Pagination links
//!
//! Relative URLs for a search. The browser side builds the same strings, so
//! the parameter order (`g`, `p`, `q`) and omission rules must not change.

use super::types::SearchRequest;
use url::form_urlencoded::byte_serialize;

fn escape(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

impl SearchRequest {
    /// Relative URL of this search, leaving out default values.
    pub fn href(&self) -> String {
        let mut components = Vec::with_capacity(3);

        if !self.lang.is_empty() {
            components.push(format!("g={}", escape(&self.lang)));
        }
        if self.page > 1 && !self.query.is_empty() {
            components.push(format!("p={}", self.page));
        }
        if !self.query.is_empty() {
            components.push(format!("q={}", escape(&self.query)));
        }

        if components.is_empty() {
            return "/".to_string();
        }
        format!("/?{}", components.join("&"))
    }

    /// Relative URL of the previous page; never goes below page 1.
    pub fn previous_page_href(&self) -> String {
        if self.page < 2 {
            return self.href();
        }
        SearchRequest {
            page: self.page - 1,
            ..self.clone()
        }
        .href()
    }

    /// Relative URL of the next page; always strictly after the current one.
    pub fn next_page_href(&self) -> String {
        let mut page = self.page.saturating_add(1);
        if page == 1 {
            page += 1;
        }
        SearchRequest {
            page,
            ..self.clone()
        }
        .href()
    }
}
