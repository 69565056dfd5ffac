//! Enricher behavior against scripted generators and a stand-in Gemini endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::{Value, json};

use oralscan_core::models::bucket::Bucket;
use oralscan_core::models::confidence::Confidence;
use oralscan_core::models::result::{LesionClassification, Level1Result, Level2Result, ResultModel};
use oralscan_suggest::enricher::SuggestionEnricher;
use oralscan_suggest::error::EnrichmentError;
use oralscan_suggest::fallback::fallback_suggestions;
use oralscan_suggest::gemini::GeminiGenerator;
use oralscan_suggest::generator::{BoxFuture, TextGenerator};

const GOOD_REPLY: &str = r#"```json
[
  {"title": "See a Surgeon", "description": "Book an oral surgeon visit this week"},
  {"title": "Biopsy", "description": "Ask about a biopsy"},
  {"title": "No Tobacco", "description": "Avoid all tobacco products"},
  {"title": "Track It", "description": "Photograph the lesion weekly"}
]
```"#;

struct Scripted {
    reply: Result<String, String>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn new(reply: Result<&str, &str>) -> (Arc<dyn TextGenerator>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator: Arc<dyn TextGenerator> = Arc::new(Self {
            reply: reply.map(str::to_string).map_err(str::to_string),
            delay: Duration::ZERO,
            calls: calls.clone(),
        });
        (generator, calls)
    }
}

impl TextGenerator for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, EnrichmentError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.reply.clone().map_err(EnrichmentError::Invocation)
        })
    }
}

fn malignant() -> ResultModel {
    ResultModel::new(
        Level1Result::new(false, Confidence::from_raw(Some(84.4))),
        Some(Level2Result::classified(
            LesionClassification::Malignant,
            Confidence::from_raw(Some(88.0)),
        )),
    )
    .unwrap()
}

fn healthy() -> ResultModel {
    ResultModel::healthy(Confidence::from_raw(Some(97.2)))
}

#[tokio::test]
async fn no_backend_returns_fallback() {
    let enricher = SuggestionEnricher::disabled();
    assert!(!enricher.has_backend());
    for result in [healthy(), malignant()] {
        let items = enricher.suggest(&result).await;
        assert_eq!(items, fallback_suggestions(Bucket::of(&result)));
    }
}

#[tokio::test]
async fn generated_suggestions_are_used() {
    let (generator, calls) = Scripted::new(Ok(GOOD_REPLY));
    let enricher = SuggestionEnricher::new(Some(generator));

    let items = enricher.suggest(&malignant()).await;
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].title, "See a Surgeon");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn backend_error_falls_back() {
    let (generator, _) = Scripted::new(Err("quota exceeded"));
    let enricher = SuggestionEnricher::new(Some(generator));

    let items = enricher.suggest(&malignant()).await;
    assert_eq!(items, fallback_suggestions(Bucket::Malignant));
}

#[tokio::test]
async fn short_reply_falls_back() {
    let (generator, _) = Scripted::new(Ok(r#"[{"title": "Only", "description": "one"}]"#));
    let enricher = SuggestionEnricher::new(Some(generator));

    let items = enricher.suggest(&healthy()).await;
    assert_eq!(items, fallback_suggestions(Bucket::Healthy));
}

#[tokio::test]
async fn slow_backend_times_out_to_fallback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator: Arc<dyn TextGenerator> = Arc::new(Scripted {
        reply: Ok(GOOD_REPLY.to_string()),
        delay: Duration::from_secs(5),
        calls,
    });
    let enricher =
        SuggestionEnricher::new(Some(generator)).with_timeout(Duration::from_millis(100));

    let items = enricher.suggest(&malignant()).await;
    assert_eq!(items, fallback_suggestions(Bucket::Malignant));
}

#[tokio::test]
async fn computed_once_per_result() {
    let (generator, calls) = Scripted::new(Ok(GOOD_REPLY));
    let enricher = SuggestionEnricher::new(Some(generator));
    let result = malignant();

    let (a, b) = tokio::join!(enricher.suggest(&result), enricher.suggest(&result));
    assert_eq!(a, b);
    let _ = enricher.suggest(&result).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A different result is a new computation.
    let _ = enricher.suggest(&healthy()).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalidate_forces_recompute() {
    let (generator, calls) = Scripted::new(Ok(GOOD_REPLY));
    let enricher = SuggestionEnricher::new(Some(generator));
    let result = malignant();

    let _ = enricher.suggest(&result).await;
    enricher.invalidate().await;
    let _ = enricher.suggest(&result).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_api_key_builds_no_generator() {
    let generator =
        GeminiGenerator::from_api_key(Some("   ".to_string()), "gemini-2.0-flash", Duration::from_secs(5))
            .unwrap();
    assert!(generator.is_none());
    let generator =
        GeminiGenerator::from_api_key(None, "gemini-2.0-flash", Duration::from_secs(5)).unwrap();
    assert!(generator.is_none());
}

#[derive(Clone)]
struct GeminiStub {
    status: StatusCode,
    body: Value,
    hits: Arc<AtomicUsize>,
}

async fn generate_handler(
    State(stub): State<GeminiStub>,
    Query(query): Query<std::collections::HashMap<String, String>>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    if query.get("key").map(String::as_str) != Some("test-key") {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" })));
    }
    let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if prompt.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "empty prompt" })));
    }
    (stub.status, Json(stub.body.clone()))
}

async fn spawn_gemini(status: StatusCode, body: Value) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/v1beta/models/{*rest}", post(generate_handler))
        .with_state(GeminiStub {
            status,
            body,
            hits: hits.clone(),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

fn gemini_enricher(base_url: &str) -> SuggestionEnricher {
    let generator = GeminiGenerator::from_api_key(
        Some("test-key".to_string()),
        "gemini-2.0-flash",
        Duration::from_secs(5),
    )
    .unwrap()
    .unwrap()
    .with_base_url(base_url);
    SuggestionEnricher::new(Some(Arc::new(generator)))
}

#[tokio::test]
async fn gemini_reply_is_parsed() {
    let (url, hits) = spawn_gemini(
        StatusCode::OK,
        json!({ "candidates": [{ "content": { "parts": [{ "text": GOOD_REPLY }] } }] }),
    )
    .await;

    let items = gemini_enricher(&url).suggest(&malignant()).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(items[1].title, "Biopsy");
}

#[tokio::test]
async fn gemini_server_error_falls_back() {
    let (url, _) = spawn_gemini(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "message": "internal" } }),
    )
    .await;

    let items = gemini_enricher(&url).suggest(&malignant()).await;
    assert_eq!(items, fallback_suggestions(Bucket::Malignant));
}

#[tokio::test]
async fn gemini_unreachable_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let items = gemini_enricher(&format!("http://{addr}"))
        .suggest(&healthy())
        .await;
    assert_eq!(items, fallback_suggestions(Bucket::Healthy));
}

#[tokio::test]
#[ignore = "requires GEMINI_API_KEY and network access"]
async fn live_gemini_returns_four() {
    let generator = GeminiGenerator::from_api_key(
        std::env::var("GEMINI_API_KEY").ok(),
        "gemini-2.0-flash",
        Duration::from_secs(30),
    )
    .unwrap()
    .expect("GEMINI_API_KEY set");
    let enricher = SuggestionEnricher::new(Some(Arc::new(generator)));
    assert_eq!(enricher.suggest(&healthy()).await.len(), 4);
}
