//! Axum route handlers for the Tweet Generation API.

use axum::{
    extract::{Query, State},
    Json,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::cache::CacheKey;
use crate::generation::hashtags::suggest_hashtags;
use crate::generation::length::LengthTier;
use crate::generation::prompts::{build_tweet_prompt, TWEET_SYSTEM};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Request body for tweet generation.
///
/// Only `topic` and `mood` are validated (non-empty). Everything else keeps
/// the wire contract's permissive defaults: `count` is unbounded and an
/// unrecognized `length` falls into the long tier.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTweetsRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default)]
    pub emojis: Vec<String>,
}

fn default_count() -> usize {
    1
}

fn default_tone() -> String {
    "casual".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_length() -> String {
    "medium".to_string()
}

#[derive(Debug, Serialize)]
pub struct GenerateTweetsResponse {
    pub tweets: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestHashtagsQuery {
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestHashtagsResponse {
    pub hashtags: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tweets/generate
///
/// Validate → cache lookup → fan out `count` parallel completions → cache
/// write + sweep → respond. A fresh cached result is returned as-is, even
/// when the caller requested a different `count` than what was cached.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateTweetsRequest>,
) -> Result<Json<GenerateTweetsResponse>, AppError> {
    // Whitespace-only topic/mood is rejected along with the empty string:
    // a blank value produces a meaningless prompt and would still occupy
    // its own cache key.
    if request.topic.trim().is_empty() || request.mood.trim().is_empty() {
        return Err(AppError::Validation(
            "Topic and mood are required".to_string(),
        ));
    }

    let key = CacheKey {
        topic: &request.topic,
        mood: &request.mood,
        hashtags: &request.hashtags,
        tone: &request.tone,
        language: &request.language,
        length: &request.length,
        emojis: &request.emojis,
    }
    .encode()
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode cache key: {e}")))?;

    if let Some(tweets) = state.cache.get(&key) {
        info!(
            "Cache hit for topic {:?} ({} tweets)",
            request.topic,
            tweets.len()
        );
        return Ok(Json(GenerateTweetsResponse { tweets }));
    }

    let tier = LengthTier::parse(&request.length);
    let prompt = build_tweet_prompt(
        &request.topic,
        &request.mood,
        &request.tone,
        tier,
        &request.emojis,
        &request.hashtags,
    );

    // All-or-nothing fan-out: one completion per requested variation, all
    // awaited together. Any single failure fails the whole batch.
    let calls = (0..request.count)
        .map(|_| state.provider.complete(TWEET_SYSTEM, &prompt, tier.max_tokens()));
    let tweets = try_join_all(calls)
        .await
        .map_err(|e| AppError::Llm(format!("Completion call failed: {e}")))?;

    state.cache.insert(key, tweets.clone());

    info!(
        "Generated {} tweets for topic {:?}",
        tweets.len(),
        request.topic
    );

    Ok(Json(GenerateTweetsResponse { tweets }))
}

/// GET /api/v1/hashtags/suggest?topic=...
///
/// Suggested hashtag chips for the form UI. Blank topic yields an empty list.
pub async fn handle_suggest_hashtags(
    Query(query): Query<SuggestHashtagsQuery>,
) -> Json<SuggestHashtagsResponse> {
    Json(SuggestHashtagsResponse {
        hashtags: suggest_hashtags(&query.topic),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::generation::cache::TweetCache;
    use crate::llm_client::{CompletionProvider, LlmError};
    use crate::routes::build_router;
    use crate::state::AppState;

    /// Counts calls, records the last token budget it was handed, and
    /// returns distinct canned tweets; fails every call when `fail` is set.
    struct MockProvider {
        calls: AtomicUsize,
        last_max_tokens: AtomicUsize,
        fail: bool,
    }

    impl MockProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_max_tokens: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_max_tokens: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_max_tokens(&self) -> usize {
            self.last_max_tokens.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(
            &self,
            _system: &str,
            prompt: &str,
            max_tokens: u32,
        ) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_max_tokens
                .store(max_tokens as usize, Ordering::SeqCst);
            if self.fail {
                return Err(LlmError::EmptyContent);
            }
            // Echo part of the prompt so cross-contamination would be visible
            let topic_line = prompt.lines().next().unwrap_or_default().to_string();
            Ok(format!("tweet {n}: {topic_line}"))
        }
    }

    fn test_state(provider: Arc<MockProvider>, cache: TweetCache) -> AppState {
        AppState {
            provider,
            cache: Arc::new(cache),
            config: Config {
                openrouter_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                static_dir: "static".to_string(),
            },
        }
    }

    fn generate_body(topic: &str, mood: &str, count: usize) -> Value {
        json!({ "topic": topic, "mood": mood, "count": count })
    }

    async fn post_generate(app: &axum::Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/tweets/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_missing_topic_is_400_without_provider_call() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (status, body) = post_generate(&app, json!({ "mood": "happy" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("required"));
        assert_eq!(provider.call_count(), 0, "must not hit the provider");
    }

    #[tokio::test]
    async fn test_blank_mood_is_400_without_provider_call() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (status, _) =
            post_generate(&app, json!({ "topic": "rust", "mood": "   " })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_count_n_yields_n_tweets() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (status, body) = post_generate(&app, generate_body("rust", "happy", 3)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tweets"].as_array().unwrap().len(), 3);
        assert_eq!(provider.call_count(), 3, "one provider call per variation");
    }

    #[tokio::test]
    async fn test_count_defaults_to_one() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (status, body) =
            post_generate(&app, json!({ "topic": "rust", "mood": "happy" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tweets"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_length_tier_budget_reaches_the_provider() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        // Distinct topics so each request misses the cache
        for (length, budget) in [("short", 100), ("medium", 200), ("long", 280)] {
            let (status, _) = post_generate(
                &app,
                json!({ "topic": length, "mood": "happy", "length": length }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                provider.last_max_tokens(),
                budget,
                "{length} requests must carry a {budget}-token budget"
            );
        }

        // Unrecognized length falls into the long tier's budget
        post_generate(
            &app,
            json!({ "topic": "mystery", "mood": "happy", "length": "novella" }),
        )
        .await;
        assert_eq!(provider.last_max_tokens(), 280);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider_even_with_different_count() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (_, first) = post_generate(&app, generate_body("rust", "happy", 2)).await;
        let (status, second) = post_generate(&app, generate_body("rust", "happy", 5)).await;

        assert_eq!(status, StatusCode::OK);
        // Memoization shortcut: the cached 2-tweet batch is returned as-is
        assert_eq!(second["tweets"], first["tweets"]);
        assert_eq!(second["tweets"].as_array().unwrap().len(), 2);
        assert_eq!(provider.call_count(), 2, "second request must be served from cache");
    }

    #[tokio::test]
    async fn test_requests_differing_in_key_fields_generate_independently() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (_, rust) = post_generate(&app, generate_body("rust", "happy", 1)).await;
        let (_, go) = post_generate(&app, generate_body("go", "happy", 1)).await;

        assert_ne!(rust["tweets"], go["tweets"]);
        assert_eq!(provider.call_count(), 2);

        // Same topic, different language — also a distinct key
        post_generate(
            &app,
            json!({ "topic": "rust", "mood": "happy", "language": "fr" }),
        )
        .await;
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_fresh_generation() {
        let provider = MockProvider::new();
        // Zero freshness window: every cached entry is already stale
        let app = build_router(test_state(
            provider.clone(),
            TweetCache::with_ttl(Duration::ZERO),
        ));

        post_generate(&app, generate_body("rust", "happy", 1)).await;
        let (status, _) = post_generate(&app, generate_body("rust", "happy", 1)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(provider.call_count(), 2, "stale entry must not be served");
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic_500() {
        let provider = MockProvider::failing();
        let app = build_router(test_state(provider.clone(), TweetCache::new()));

        let (status, body) = post_generate(&app, generate_body("rust", "happy", 3)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate tweets");
    }

    #[tokio::test]
    async fn test_failed_batch_is_not_cached() {
        let provider = MockProvider::failing();
        let state = test_state(provider.clone(), TweetCache::new());
        let cache = state.cache.clone();
        let app = build_router(state);

        post_generate(&app, generate_body("rust", "happy", 2)).await;

        assert!(cache.is_empty(), "a failed batch must not be cached");
    }

    #[tokio::test]
    async fn test_get_on_generate_route_is_405() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider, TweetCache::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/tweets/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_suggest_hashtags_endpoint() {
        let provider = MockProvider::new();
        let app = build_router(test_state(provider, TweetCache::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/hashtags/suggest?topic=Rust%20Web%20Servers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["hashtags"], json!(["#rust", "#web", "#servers"]));
    }
}
