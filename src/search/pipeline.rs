use super::errors::SearchError;
use super::joiner::{join_hits, ranked_refs};
use super::query::normalize_query;
use super::types::{Hit, ResultPage, SearchRequest, SearchResult};
use crate::bangs::{BangTable, detect_bang};
use crate::config::Config;
use crate::index::builder::{FieldWeights, build_docs_request, build_text_request};
use crate::index::client::{self, IndexClient};
use crate::index::protocol::{DocHit, ENDPOINT_DOCS_SEARCH, ENDPOINT_TEXT_SEARCH, TextHit};

use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Everything a search needs, built once at startup and shared read-only.
pub struct Pipeline {
    config: Config,
    bangs: BangTable,
    weights: FieldWeights,
    text_client: Option<IndexClient>,
    docs_client: Option<IndexClient>,
}

impl Pipeline {
    /// Loads the bang table and sets up both index clients.
    ///
    /// An invalid bang table is fatal. A service URL that cannot be used only
    /// leaves that handle unset, so searches fail with `NoClient` while bangs
    /// and the home page keep working.
    pub fn initialize(config: Config) -> Result<Self> {
        let bangs = match &config.bangs_path {
            Some(path) => BangTable::load(path)?,
            None => BangTable::builtin()?,
        };

        let text_client = connect_or_warn(
            "text index",
            &config.elasticsearch_text,
            config.request_timeout,
        );
        let docs_client = connect_or_warn(
            "document store",
            &config.elasticsearch_docs,
            config.request_timeout,
        );

        Ok(Self::new(config, bangs, text_client, docs_client))
    }

    pub fn new(
        config: Config,
        bangs: BangTable,
        text_client: Option<IndexClient>,
        docs_client: Option<IndexClient>,
    ) -> Self {
        Self {
            config,
            bangs,
            weights: FieldWeights::default(),
            text_client,
            docs_client,
        }
    }

    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bangs(&self) -> &BangTable {
        &self.bangs
    }

    /// Checks both services once; failures are logged, never fatal.
    pub async fn probe_services(&self) {
        for client in [&self.text_client, &self.docs_client].into_iter().flatten() {
            client.probe().await;
        }
    }

    /// Applies the query term limit, returning the request actually searched
    /// and the first dropped word.
    pub fn normalize(&self, request: &SearchRequest) -> (SearchRequest, Option<String>) {
        let (query, extra) = normalize_query(&request.query, self.config.max_query_terms);
        (
            SearchRequest {
                query,
                ..request.clone()
            },
            extra,
        )
    }

    /// Runs a search and fills in the total processing time.
    pub async fn perform_search_with_timing(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchError> {
        self.search_page(request).await.map(|page| page.result)
    }

    /// Runs a search and pairs the result with the request actually searched,
    /// as shown on the result page.
    pub async fn search_page(&self, request: &SearchRequest) -> Result<ResultPage, SearchError> {
        let span = tracing::info_span!(
            "search",
            request_id = %uuid::Uuid::new_v4(),
            lang = %request.lang,
            page = request.page
        );

        async {
            let start = Instant::now();

            let (search, extra) = self.normalize(request);
            let mut result = self.perform_search(&search).await?;

            result.extra = extra;
            result.timing.total = micros(start.elapsed());

            tracing::debug!(
                "Search done: {} hits, timing {:?}",
                result.hits.len(),
                result.timing
            );
            Ok::<_, SearchError>(ResultPage {
                search,
                kind: None,
                result,
            })
        }
        .instrument(span)
        .await
    }

    /// Performs the search itself. Two requests are made:
    ///  - First to the text index, to get the matching document IDs
    ///  - Then to the document store with these IDs, to get titles and summaries
    pub async fn perform_search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        if let Some(redirect) = detect_bang(&self.bangs, &request.query, &request.lang) {
            return Ok(SearchResult::redirect(redirect));
        }

        if request.query.is_empty() {
            return Ok(SearchResult::default());
        }

        if self.config.test_data {
            return Ok(generate_test_data());
        }

        let mut result = SearchResult::default();
        let page_size = self.config.result_page_size;

        let text_body = build_text_request(
            &request.query,
            &request.lang,
            request.page,
            page_size,
            &self.weights,
        );
        let text = client::request::<TextHit, _>(
            self.text_client.as_ref(),
            ENDPOINT_TEXT_SEARCH,
            &text_body,
        )
        .await
        .map_err(|e| {
            tracing::error!("Text index request failed: {}", e);
            SearchError::TextIndex(e)
        })?;

        result.timing.text_request = micros(text.elapsed);
        result.timing.text_query = text.value.took_micros();

        let ranked = ranked_refs(text.value.hits());
        if ranked.is_empty() {
            return Ok(result);
        }

        // A full page is the only hint that more results exist.
        result.has_more = ranked.len() >= page_size;

        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        let docs_body = build_docs_request(&ids);
        let docs = client::request::<DocHit, _>(
            self.docs_client.as_ref(),
            ENDPOINT_DOCS_SEARCH,
            &docs_body,
        )
        .await
        .map_err(|e| {
            tracing::error!("Document store request failed: {}", e);
            SearchError::DocStore(e)
        })?;

        result.timing.docs_request = micros(docs.elapsed);
        result.timing.docs_query = docs.value.took_micros();

        result.hits = join_hits(&ranked, docs.value.into_hits(), &request.query);

        Ok(result)
    }
}

fn connect_or_warn(name: &'static str, url: &str, timeout: Duration) -> Option<IndexClient> {
    match IndexClient::connect(name, url, timeout) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::error!("Could not set up {}: {:#}", name, e);
            None
        }
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Fixed mock hits used when running without index services.
pub fn generate_test_data() -> SearchResult {
    SearchResult {
        hits: vec![
            Hit {
                id: "1".to_string(),
                title: "Page 1".to_string(),
                url: "http://www.example.com/page/1".to_string(),
                summary: "summary 1".to_string(),
            },
            Hit {
                id: "2".to_string(),
                title: "Page 2".to_string(),
                url: "http://www.example.com/page/2".to_string(),
                summary: "summary 2".to_string(),
            },
        ],
        ..SearchResult::default()
    }
}
