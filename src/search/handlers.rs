use super::pipeline::Pipeline;
use super::types::{PageKind, ResultPage, SearchRequest, SearchResult};

use axum::extract::Query;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Main search route (HTML result pages are rendered from its payload).
pub const ROUTE_SEARCH: &str = "/";
/// JSON search API.
pub const ROUTE_API_SEARCH: &str = "/api/search";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub g: Option<String>,
    pub p: Option<String>,
}

impl SearchParams {
    pub fn into_request(self, default_lang: &str) -> SearchRequest {
        SearchRequest::from_params(
            self.q.as_deref(),
            self.g.as_deref(),
            self.p.as_deref(),
            default_lang,
        )
    }
}

/// Creates the router with both search routes.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route(ROUTE_SEARCH, get(handle_search))
        .route(ROUTE_API_SEARCH, get(handle_api_search))
        .layer(Extension(pipeline))
}

/// Handles the home and result pages (`/` or `/?q=*`).
///
/// Answers with the page data for the renderer, or with a `302` when the
/// query used a bang.
pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(pipeline): Extension<Arc<Pipeline>>,
) -> Response {
    let request = params.into_request(&pipeline.config().default_lang);

    // Empty query: render the "home" version
    if request.query.is_empty() {
        return Json(ResultPage {
            search: request,
            kind: Some(PageKind::Home),
            result: SearchResult::default(),
        })
        .into_response();
    }

    match pipeline.search_page(&request).await {
        Ok(page) => {
            if let Some(url) = &page.result.redirect {
                return (StatusCode::FOUND, [(header::LOCATION, url.clone())]).into_response();
            }
            Json(page).into_response()
        }
        Err(e) => {
            tracing::error!(
                "Search for {:?} failed after {:?}: {}",
                request.query,
                e.index_error().elapsed(),
                e
            );
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Handles the JSON API (`/api/search?q=*`).
pub async fn handle_api_search(
    Query(params): Query<SearchParams>,
    Extension(pipeline): Extension<Arc<Pipeline>>,
) -> Result<Json<SearchResult>, (StatusCode, String)> {
    let request = params.into_request(&pipeline.config().default_lang);

    match pipeline.perform_search_with_timing(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!(
                "API search for {:?} failed after {:?}: {}",
                request.query,
                e.index_error().elapsed(),
                e
            );
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
