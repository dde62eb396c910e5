// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use companion_chat_node::api::{build_router, AppState};
    use companion_chat_node::cache::ResponseCache;
    use companion_chat_node::config::AppConfig;
    use companion_chat_node::conversation::{ConversationManager, FALLBACK_RESPONSES};
    use companion_chat_node::generation::{GenerationError, TextGenerator};
    use companion_chat_node::sentiment::{SentimentAnalyzer, SentimentBackend, SentimentError};
    use companion_chat_node::topics::TOPIC_CATALOG;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct ScriptedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _: &str, _: usize) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _: &str, _: usize) -> Result<String, GenerationError> {
            Err(GenerationError::Backend("down".to_string()))
        }
    }

    struct CountingSentiment {
        label: &'static str,
        confidence: f32,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SentimentBackend for CountingSentiment {
        async fn classify(&self, _: &str) -> Result<(String, f32), SentimentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.label.to_string(), self.confidence))
        }
    }

    fn app(
        generator: Arc<dyn TextGenerator>,
        sentiment_backend: Arc<dyn SentimentBackend>,
    ) -> Router {
        let config = AppConfig::default();
        build_router(AppState {
            manager: Arc::new(ConversationManager::new(generator, &config)),
            sentiment: Arc::new(SentimentAnalyzer::new(sentiment_backend, config.neutral_band)),
            sentiment_cache: Arc::new(ResponseCache::new(64, Duration::from_secs(60))),
        })
    }

    fn default_app() -> Router {
        app(
            Arc::new(ScriptedGenerator("It is a fine day.")),
            Arc::new(CountingSentiment {
                label: "positive",
                confidence: 0.9,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = default_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_chat_happy_path() {
        let request = post_json(
            "/api/chat",
            json!({
                "message": "How are you?",
                "conversation_history": [
                    {"sender": "user", "text": "Hello"},
                    {"sender": "assistant", "text": "Hello! Nice to see you."}
                ]
            }),
        );

        let response = default_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["response"], "It is a fine day.");
        assert!(uuid::Uuid::parse_str(body["request_id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_chat_missing_message_is_rejected() {
        let response = default_app()
            .oneshot(post_json("/api/chat", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error_type"], "invalid_request");
    }

    #[tokio::test]
    async fn test_chat_absorbs_generator_failure() {
        let router = app(
            Arc::new(FailingGenerator),
            Arc::new(CountingSentiment {
                label: "neutral",
                confidence: 0.9,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let response = router
            .oneshot(post_json("/api/chat", json!({"message": "Hello"})))
            .await
            .unwrap();

        // Backend failure must not surface as an HTTP error
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let reply = body["response"].as_str().unwrap();
        assert!(FALLBACK_RESPONSES.contains(&reply));
    }

    #[tokio::test]
    async fn test_sentiment_neutral_band_applied() {
        let router = app(
            Arc::new(ScriptedGenerator("unused")),
            Arc::new(CountingSentiment {
                label: "negative",
                confidence: 0.5,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let response = router
            .oneshot(post_json("/api/sentiment", json!({"message": "it was okay"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sentiment"], "neutral");
        assert_eq!(body["message"], "it was okay");
    }

    #[tokio::test]
    async fn test_sentiment_cached_by_message() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = app(
            Arc::new(ScriptedGenerator("unused")),
            Arc::new(CountingSentiment {
                label: "positive",
                confidence: 0.95,
                calls: calls.clone(),
            }),
        );

        for _ in 0..2 {
            let response = router
                .clone()
                .oneshot(post_json("/api/sentiment", json!({"message": "lovely day"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["sentiment"], "positive");
        }

        // Second request served from cache
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sentiment_missing_message_is_rejected() {
        let response = default_app()
            .oneshot(post_json("/api/sentiment", json!({"message": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_topics_endpoint() {
        let response = default_app()
            .oneshot(
                Request::builder()
                    .uri("/api/topics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let topics = body["topics"].as_array().unwrap();

        assert_eq!(topics.len(), 4);
        let unique: HashSet<&str> = topics.iter().filter_map(|t| t.as_str()).collect();
        assert_eq!(unique.len(), topics.len());
        for topic in unique {
            assert!(TOPIC_CATALOG.contains(&topic));
        }
    }
}
