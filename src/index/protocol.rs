//! Index Service Protocol
//!
//! Endpoints and response schemas of the two Elasticsearch-compatible services.
//! Responses are decoded into these types up front, so a shape mismatch is
//! reported as a decode error instead of surfacing later during the join.

use serde::de::{self, Deserializer};
use serde::Deserialize;

// --- API Endpoints ---

/// Search endpoint of the text-relevance index.
pub const ENDPOINT_TEXT_SEARCH: &str = "/text/page/_search";
/// Search endpoint of the document store.
pub const ENDPOINT_DOCS_SEARCH: &str = "/docs/page/_search";

// --- Responses ---

/// Top level of a `_search` answer.
#[derive(Debug, Deserialize)]
pub struct IndexResponse<H> {
    /// Server-side query time in milliseconds.
    #[serde(default)]
    pub took: u64,
    /// Absent when the service found nothing to report.
    #[serde(default = "Option::default")]
    pub hits: Option<HitsEnvelope<H>>,
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope<H> {
    #[serde(default = "Vec::new")]
    pub hits: Vec<H>,
}

impl<H> IndexResponse<H> {
    /// The returned hits in service order; empty when there were none.
    pub fn hits(&self) -> &[H] {
        self.hits.as_ref().map(|h| h.hits.as_slice()).unwrap_or(&[])
    }

    pub fn into_hits(self) -> Vec<H> {
        self.hits.map(|h| h.hits).unwrap_or_default()
    }

    /// Server-reported query time in microseconds.
    pub fn took_micros(&self) -> u64 {
        self.took.saturating_mul(1000)
    }
}

/// A ranked hit from the text index. Only the identifier is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TextHit {
    #[serde(rename = "_id")]
    pub id: String,
}

/// A stored document from the document store.
#[derive(Debug, Clone, Deserialize)]
pub struct DocHit {
    #[serde(rename = "_id")]
    pub id: String,
    pub fields: DocFields,
}

/// Display fields of a document. Stored fields come back as one-element arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct DocFields {
    #[serde(deserialize_with = "first_value")]
    pub title: String,
    #[serde(deserialize_with = "first_value")]
    pub summary: String,
    #[serde(deserialize_with = "first_value")]
    pub url: String,
}

pub type TextResponse = IndexResponse<TextHit>;
pub type DocsResponse = IndexResponse<DocHit>;

/// Accepts either a bare string or a non-empty array of strings and keeps the first.
fn first_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => Ok(value),
        OneOrMany::Many(values) => values
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::invalid_length(0, &"at least one stored value")),
    }
}
