//! Index Module Tests
//!
//! ## Test Scopes
//! - **Builder**: Exact JSON shape of the text and docs query bodies.
//! - **Protocol**: Decoding of service answers, including malformed ones.
//! - **Client**: Real HTTP round trips against throwaway axum servers acting as
//!   the text index and document store.

#[cfg(test)]
mod tests {
    use crate::index::builder::{
        FieldWeights, build_docs_request, build_text_request, DOCS_MAX_SIZE,
    };
    use crate::index::client::{self, IndexClient};
    use crate::index::errors::IndexError;
    use crate::index::protocol::{
        DocsResponse, ENDPOINT_DOCS_SEARCH, ENDPOINT_TEXT_SEARCH, TextHit, TextResponse,
    };
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn spawn_fake_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str) -> IndexClient {
        IndexClient::connect("test index", base_url, Duration::from_secs(2)).unwrap()
    }

    // ============================================================
    // BUILDER TESTS - text index body
    // ============================================================

    #[test]
    fn test_text_request_shape() {
        let body = build_text_request("rust book", "en", 1, 25, &FieldWeights::default());
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({
                "query": {
                    "function_score": {
                        "query": {
                            "multi_match": {
                                "query": "rust book",
                                "minimum_should_match": "-25%",
                                "type": "cross_fields",
                                "tie_breaker": 0.5,
                                "fields": ["title^3", "body", "url_words^2", "domain_words^8"]
                            }
                        },
                        "functions": [
                            {"field_value_factor": {"field": "rank", "factor": 1.0, "missing": 0.0}},
                            {"field_value_factor": {"field": "lang_en", "missing": 0.002f32}}
                        ]
                    }
                },
                "from": 0,
                "size": 25
            })
        );
    }

    #[test]
    fn test_text_request_pagination_offset() {
        let body = build_text_request("x", "en", 3, 25, &FieldWeights::default());
        assert_eq!(body.from, 50);
        assert_eq!(body.size, 25);

        // Page 0 is treated as the first page
        let body = build_text_request("x", "en", 0, 10, &FieldWeights::default());
        assert_eq!(body.from, 0);
    }

    #[test]
    fn test_text_request_all_languages_has_no_language_boost() {
        let body = build_text_request("x", "all", 1, 25, &FieldWeights::default());
        let functions = &body.query.function_score.functions;

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].field_value_factor.field, "rank");
    }

    #[test]
    fn test_text_request_escapes_user_text() {
        let query = r#"he said "hi" \ {"#;
        let body = build_text_request(query, "en", 1, 25, &FieldWeights::default());
        let encoded = serde_json::to_string(&body).unwrap();

        // Round trip through JSON must give back the exact query
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            decoded["query"]["function_score"]["query"]["multi_match"]["query"],
            query
        );
    }

    #[test]
    fn test_custom_field_weights() {
        let weights = FieldWeights {
            title: 1,
            body: 4,
            url_words: 1,
            domain_words: 2,
        };

        assert_eq!(
            weights.boosted_fields(),
            vec!["title", "body^4", "url_words", "domain_words^2"]
        );
    }

    // ============================================================
    // BUILDER TESTS - document store body
    // ============================================================

    #[test]
    fn test_docs_request_shape() {
        let body = build_docs_request(&["id2", "id1"]);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({
                "query": {
                    "filtered": {
                        "filter": {
                            "bool": {
                                "must": [{"ids": {"type": "page", "values": ["id2", "id1"]}}]
                            }
                        }
                    }
                },
                "fields": ["title", "summary", "url"],
                "size": 100
            })
        );
    }

    #[test]
    fn test_docs_request_size_is_fixed() {
        let ids: Vec<String> = (0..5).map(|i| format!("doc{}", i)).collect();
        let body = build_docs_request(&ids);

        assert_eq!(body.size, DOCS_MAX_SIZE);
        assert_eq!(body.query.filtered.filter.bool_filter.must[0].ids.values, ids);
    }

    // ============================================================
    // PROTOCOL TESTS
    // ============================================================

    #[test]
    fn test_decode_text_response() {
        let response: TextResponse = serde_json::from_value(json!({
            "took": 12,
            "timed_out": false,
            "hits": {"total": 2, "hits": [{"_id": "b", "_score": 2.0}, {"_id": "a", "_score": 1.0}]}
        }))
        .unwrap();

        let ids: Vec<&str> = response.hits().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(response.took_micros(), 12_000);
    }

    #[test]
    fn test_decode_response_without_hits() {
        let response: TextResponse = serde_json::from_value(json!({"took": 1})).unwrap();
        assert!(response.hits().is_empty());
        assert!(response.into_hits().is_empty());
    }

    #[test]
    fn test_decode_docs_response_takes_first_stored_value() {
        let response: DocsResponse = serde_json::from_value(json!({
            "took": 3,
            "hits": {"hits": [{
                "_id": "a",
                "fields": {
                    "title": ["Title A"],
                    "summary": ["Summary A", "ignored"],
                    "url": "http://a.example.com/"
                }
            }]}
        }))
        .unwrap();

        let hit = &response.hits()[0];
        assert_eq!(hit.fields.title, "Title A");
        assert_eq!(hit.fields.summary, "Summary A");
        assert_eq!(hit.fields.url, "http://a.example.com/");
    }

    #[test]
    fn test_decode_docs_response_rejects_missing_fields() {
        let missing_url = json!({
            "took": 3,
            "hits": {"hits": [{"_id": "a", "fields": {"title": ["A"], "summary": ["S"]}}]}
        });
        assert!(serde_json::from_value::<DocsResponse>(missing_url).is_err());

        let empty_title = json!({
            "took": 3,
            "hits": {"hits": [{"_id": "a", "fields": {"title": [], "summary": ["S"], "url": ["u"]}}]}
        });
        assert!(serde_json::from_value::<DocsResponse>(empty_title).is_err());
    }

    // ============================================================
    // CLIENT TESTS
    // ============================================================

    #[test]
    fn test_connect_rejects_invalid_urls() {
        assert!(IndexClient::connect("text", "not a url", Duration::from_secs(1)).is_err());
        assert!(IndexClient::connect("text", "ftp://host:21", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_connect_trims_trailing_slash() {
        let client = IndexClient::connect("text", "http://127.0.0.1:39200/", Duration::from_secs(1))
            .unwrap();

        assert_eq!(client.base_url(), "http://127.0.0.1:39200");
        assert_eq!(
            client.endpoint(ENDPOINT_TEXT_SEARCH),
            "http://127.0.0.1:39200/text/page/_search"
        );
    }

    #[tokio::test]
    async fn test_request_without_client_fails_with_no_client() {
        let body = build_docs_request(&["a"]);
        let result = client::request::<TextHit, _>(None, ENDPOINT_TEXT_SEARCH, &body).await;

        let err = result.unwrap_err();
        assert!(matches!(err, IndexError::NoClient));
        assert!(err.elapsed().is_none());
    }

    #[tokio::test]
    async fn test_request_decodes_answer_and_measures_time() {
        let router = Router::new().route(
            ENDPOINT_TEXT_SEARCH,
            post(|Json(body): Json<Value>| async move {
                // Answer with as many hits as were asked for
                let size = body["size"].as_u64().unwrap_or(0);
                let hits: Vec<Value> = (0..size).map(|i| json!({"_id": format!("doc{}", i)})).collect();
                Json(json!({"took": 4, "hits": {"hits": hits}}))
            }),
        );
        let base_url = spawn_fake_service(router).await;
        let client = client_for(&base_url);

        let body = build_text_request("x", "en", 1, 3, &FieldWeights::default());
        let timed = client
            .request::<TextHit, _>(ENDPOINT_TEXT_SEARCH, &body)
            .await
            .unwrap();

        assert_eq!(timed.value.hits().len(), 3);
        assert_eq!(timed.value.hits()[0].id, "doc0");
        assert_eq!(timed.value.took, 4);
        assert!(timed.elapsed > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_request_reports_error_status() {
        let router = Router::new().route(
            ENDPOINT_DOCS_SEARCH,
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base_url = spawn_fake_service(router).await;
        let client = client_for(&base_url);

        let err = client
            .request::<TextHit, _>(ENDPOINT_DOCS_SEARCH, &build_docs_request(&["a"]))
            .await
            .unwrap_err();

        match err {
            IndexError::Status { status, .. } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_reports_decode_error() {
        let router = Router::new().route(ENDPOINT_TEXT_SEARCH, post(|| async { "definitely not json" }));
        let base_url = spawn_fake_service(router).await;
        let client = client_for(&base_url);

        let err = client
            .request::<TextHit, _>(ENDPOINT_TEXT_SEARCH, &build_docs_request(&["a"]))
            .await
            .unwrap_err();

        assert!(matches!(err, IndexError::Decode { .. }));
        assert!(err.elapsed().is_some());
    }

    #[tokio::test]
    async fn test_request_to_unreachable_service_fails_with_request_error() {
        // Grab a free port, then close it so nothing is listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}", addr));
        let err = client
            .request::<TextHit, _>(ENDPOINT_TEXT_SEARCH, &build_docs_request(&["a"]))
            .await
            .unwrap_err();

        assert!(matches!(err, IndexError::Request { .. }));
        assert!(!client.probe().await);
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let router = Router::new().route(
            ENDPOINT_TEXT_SEARCH,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"took": 1}))
            }),
        );
        let base_url = spawn_fake_service(router).await;
        let client = IndexClient::connect("slow index", &base_url, Duration::from_millis(100)).unwrap();

        let err = client
            .request::<TextHit, _>(ENDPOINT_TEXT_SEARCH, &build_docs_request(&["a"]))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.elapsed().unwrap() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_probe_reports_healthy_service() {
        let router = Router::new().route("/", get(|| async { Json(json!({"status": "green"})) }));
        let base_url = spawn_fake_service(router).await;

        assert!(client_for(&base_url).probe().await);
    }
}
