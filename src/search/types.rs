use serde::{Deserialize, Serialize};

/// Entirely defines a search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "q")]
    pub query: String,
    #[serde(rename = "g")]
    pub lang: String,
    #[serde(rename = "p")]
    pub page: u32,
}

impl SearchRequest {
    /// Builds a request from raw URL parameters.
    ///
    /// The page falls back to 1 when missing, zero or when there is no query.
    /// An empty language is only kept for an empty query (the home page); with
    /// a query we have to guess `default_lang`.
    pub fn from_params(
        query: Option<&str>,
        lang: Option<&str>,
        page: Option<&str>,
        default_lang: &str,
    ) -> Self {
        let query = query.unwrap_or_default().trim_matches(' ').to_string();
        let mut lang = lang.unwrap_or_default().to_string();
        let mut page = page.and_then(|p| p.trim().parse::<u32>().ok()).unwrap_or(0);

        if page == 0 || query.is_empty() {
            page = 1;
        }
        if lang.is_empty() && !query.is_empty() {
            lang = default_lang.to_string();
        }

        Self { query, lang, page }
    }
}

/// A ranked identifier from the text index, in service order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedDocRef {
    pub id: String,
    pub rank: usize,
}

/// A matching document, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "i")]
    pub id: String,
    #[serde(rename = "u")]
    pub url: String,
    #[serde(rename = "t")]
    pub title: String,
    #[serde(rename = "s")]
    pub summary: String,
}

/// Timings at various steps of a request, in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingBreakdown {
    /// Query time reported by the text index.
    #[serde(rename = "tq")]
    pub text_query: u64,
    /// Round trip to the text index, measured on our side.
    #[serde(rename = "tr")]
    pub text_request: u64,
    /// Query time reported by the document store.
    #[serde(rename = "dq")]
    pub docs_query: u64,
    /// Round trip to the document store, measured on our side.
    #[serde(rename = "dr")]
    pub docs_request: u64,
    /// Total processing time on our end.
    #[serde(rename = "o")]
    pub total: u64,
}

/// The result of one search, handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "h", default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<Hit>,
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(rename = "m", default, skip_serializing_if = "std::ops::Not::not")]
    pub has_more: bool,
    #[serde(rename = "t", default)]
    pub timing: TimingBreakdown,
    /// First query word dropped by the term limit.
    #[serde(rename = "x", default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl SearchResult {
    pub fn redirect(url: String) -> Self {
        Self {
            redirect: Some(url),
            ..Self::default()
        }
    }
}

/// Kind of page the renderer should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Home,
}

/// Everything needed to render an HTML result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "s")]
    pub search: SearchRequest,
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PageKind>,
    #[serde(rename = "r")]
    pub result: SearchResult,
}
