//! Client tests against an in-process stand-in for the classifier service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::{Value, json};

use oralscan_classify::client::{ClassificationClient, ClientConfig};
use oralscan_classify::error::{ClassificationError, ClassificationErrorKind};
use oralscan_core::models::result::LesionClassification;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-body";

#[derive(Clone)]
struct Stub {
    hits: Arc<AtomicUsize>,
    status: StatusCode,
    body: Value,
    delay: Duration,
}

async fn classify_handler(
    State(stub): State<Stub>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);

    let mut saw_image = false;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("image") {
            let has_name = field.file_name().is_some_and(|n| !n.is_empty());
            let bytes = field.bytes().await.unwrap_or_default();
            saw_image = has_name && !bytes.is_empty();
        }
    }
    if !saw_image {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No image provided" })),
        );
    }

    tokio::time::sleep(stub.delay).await;
    (stub.status, Json(stub.body.clone()))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Oral Lesion Classification API is running"
    }))
}

/// Spawn a stub server and return its base URL plus the hit counter.
async fn spawn_stub(status: StatusCode, body: Value, delay: Duration) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let stub = Stub {
        hits: hits.clone(),
        status,
        body,
        delay,
    };
    let app = Router::new()
        .route("/api/classify", post(classify_handler))
        .route("/api/health", get(health_handler))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

fn client(base_url: String, timeout: Duration) -> ClassificationClient {
    ClassificationClient::new(ClientConfig {
        base_url,
        timeout,
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn healthy_response_has_no_level2() {
    let (url, hits) = spawn_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "level1": { "classification": "healthy", "is_healthy": true, "confidence": 97.2 },
            "level2": null,
            "final_result": "healthy"
        }),
        Duration::ZERO,
    )
    .await;

    let result = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(result.is_healthy());
    assert!(result.level2().is_none());
    assert_eq!(result.level1().confidence.value(), 97.2);
}

#[tokio::test]
async fn malignant_response_maps_level2() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "level1": { "classification": "unhealthy", "is_healthy": false, "confidence": 84.4 },
            "level2": { "classification": "malignant", "is_malignant": true, "confidence": 88.0 }
        }),
        Duration::ZERO,
    )
    .await;

    let result = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap();

    let level2 = result.level2().expect("unhealthy result carries level 2");
    assert_eq!(level2.classification(), Some(LesionClassification::Malignant));
    assert!(level2.is_malignant());
    assert_eq!(level2.confidence().unwrap().value(), 88.0);
}

#[tokio::test]
async fn level2_error_is_preserved() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "level1": { "classification": "unhealthy", "is_healthy": false, "confidence": 70.0 },
            "level2": { "error": "model not loaded", "message": "Malignant/Benign classification failed" }
        }),
        Duration::ZERO,
    )
    .await;

    let result = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/jpeg")
        .await
        .unwrap();

    let level2 = result.level2().unwrap();
    assert_eq!(level2.error(), Some("model not loaded"));
    assert!(level2.classification().is_none());
}

#[tokio::test]
async fn missing_confidence_maps_to_zero() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "level1": { "classification": "unhealthy", "is_healthy": false },
            "level2": { "classification": "benign", "confidence": "not-a-number" }
        }),
        Duration::ZERO,
    )
    .await;

    let result = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap();

    assert_eq!(result.level1().confidence.value(), 0.0);
    let level2 = result.level2().unwrap();
    assert_eq!(level2.classification(), Some(LesionClassification::Benign));
    assert_eq!(level2.confidence().unwrap().value(), 0.0);
}

#[tokio::test]
async fn healthy_flag_derived_from_label_when_absent() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({
            "success": true,
            "level1": { "classification": "Healthy", "confidence": 91.0 },
            "level2": { "classification": "benign", "confidence": 50.0 }
        }),
        Duration::ZERO,
    )
    .await;

    let result = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap();

    assert!(result.is_healthy());
    assert!(result.level2().is_none(), "level 2 is dropped for healthy tissue");
}

#[tokio::test]
async fn success_false_is_server_rejected() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({ "success": false, "error": "cannot identify image file" }),
        Duration::ZERO,
    )
    .await;

    let err = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClassificationErrorKind::ServerRejected);
    assert!(err.message().contains("cannot identify image file"));
}

#[tokio::test]
async fn non_2xx_is_server_rejected() {
    let (url, _) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": "boom", "message": "An error occurred during classification" }),
        Duration::ZERO,
    )
    .await;

    let err = client(url, Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap_err();

    assert!(matches!(err, ClassificationError::ServerRejected(ref m) if m == "boom"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({ "success": true }),
        Duration::from_secs(5),
    )
    .await;

    let err = client(url, Duration::from_millis(300))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClassificationErrorKind::Timeout);
}

#[tokio::test]
async fn refused_connection_is_network_unreachable() {
    // Reserve a port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}"), Duration::from_secs(5))
        .classify(PNG_BYTES, "image/png")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClassificationErrorKind::NetworkUnreachable);
}

#[tokio::test]
async fn connect_timeout_is_network_unreachable() {
    // Non-routable address: the connect attempt stalls or fails outright.
    let client = ClassificationClient::new(ClientConfig {
        base_url: "http://10.255.255.1".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_millis(200),
    })
    .unwrap();

    let err = client.classify(PNG_BYTES, "image/png").await.unwrap_err();

    assert_eq!(err.kind(), ClassificationErrorKind::NetworkUnreachable);
    assert!(err.message().starts_with("Cannot connect"), "{err}");
}

#[tokio::test]
async fn non_image_never_hits_network() {
    let (url, hits) = spawn_stub(StatusCode::OK, json!({ "success": true }), Duration::ZERO).await;

    let err = client(url, Duration::from_secs(5))
        .classify(b"hello", "text/plain")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClassificationErrorKind::InvalidInput);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_check_reports_status() {
    let (url, _) = spawn_stub(StatusCode::OK, json!({}), Duration::ZERO).await;

    let health = client(url, Duration::from_secs(5)).health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.message.is_some());
}
