//! End-to-end HTTP surface tests driving the real router in-process via
//! `tower::ServiceExt::oneshot`, without binding a socket.

mod support;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use fraud_engine::api::build_router;
use fraud_engine::config::Environment;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const BODY_LIMIT: usize = 1024 * 1024;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = build_router(support::test_state(100, Environment::Production));
    let response = app
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn cors_preflight_returns_no_content() {
    let app = build_router(support::test_state(100, Environment::Production));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/sessions")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_session_returns_404_for_signals() {
    let app = build_router(support::test_state(100, Environment::Production));
    let random_id = Uuid::new_v4();
    let request = json_request(
        Method::POST,
        &format!("/api/v1/sessions/{random_id}/signals"),
        json!({
            "sessionId": random_id,
            "signals": [{"type": "mouse_move", "timestamp": 1_700_000_000_000i64, "payload": {}}],
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn create_session_validation_rejects_missing_client_id() {
    let app = build_router(support::test_state(100, Environment::Production));
    let request = json_request(
        Method::POST,
        "/api/v1/sessions",
        json!({"clientId": "", "deviceFingerprint": "fp-1"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["clientId"].is_array());
}

#[tokio::test]
async fn signal_batch_over_1000_is_rejected() {
    let app = build_router(support::test_state(100, Environment::Production));

    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::CREATED);
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap();

    let signals: Vec<Value> = (0..1001)
        .map(|_| json!({"type": "mouse_move", "timestamp": 1_700_000_000_000i64, "payload": {}}))
        .collect();
    let request = json_request(
        Method::POST,
        &format!("/api/v1/sessions/{session_id}/signals"),
        json!({"sessionId": session_id, "signals": signals}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn full_lifecycle_round_trips_signal_count() {
    let app = build_router(support::test_state(100, Environment::Production));

    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::CREATED);
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap().to_string();

    let signals: Vec<Value> = (0..5)
        .map(|i| json!({"type": "mouse_move", "timestamp": 1_700_000_000_000i64 + i, "payload": {"x": i, "y": i}}))
        .collect();
    let ingest = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/sessions/{session_id}/signals"),
            json!({"sessionId": session_id, "signals": signals}),
        ))
        .await
        .unwrap();
    assert_eq!(ingest.status(), StatusCode::OK);
    let ingest_body = body_json(ingest).await;
    assert_eq!(ingest_body["data"]["signalsReceived"], 5);
    assert_eq!(ingest_body["data"]["totalSignals"], 5);

    let complete = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/sessions/{session_id}/complete"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(complete.status(), StatusCode::OK);
    let complete_body = body_json(complete).await;
    assert_eq!(complete_body["data"]["signalCount"], 5);
    assert_eq!(complete_body["data"]["analysisAvailable"], true);

    let analysis = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/analysis"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(analysis.status(), StatusCode::OK);
    let analysis_body = body_json(analysis).await;
    assert_eq!(analysis_body["data"]["verdict"], "ALLOW");
    assert_eq!(analysis_body["data"]["confidenceScore"], 0.0);
}

#[tokio::test]
async fn analysis_not_ready_before_completion() {
    let app = build_router(support::test_state(100, Environment::Production));
    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap().to_string();

    let analysis = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/analysis"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(analysis.status(), StatusCode::NOT_FOUND);
    let body = body_json(analysis).await;
    assert_eq!(body["error"]["code"], "ANALYSIS_NOT_READY");
}

#[tokio::test]
async fn rate_limit_boundary_admits_limit_then_denies() {
    let app = build_router(support::test_state(3, Environment::Production));

    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap().to_string();

    let one_signal = || {
        json!({
            "sessionId": session_id,
            "signals": [{"type": "mouse_move", "timestamp": 1_700_000_000_000i64, "payload": {}}],
        })
    };

    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/v1/sessions/{session_id}/signals"),
                one_signal(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {i} should be admitted");
    }

    let fourth = app
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/sessions/{session_id}/signals"),
            one_signal(),
        ))
        .await
        .unwrap();
    assert_eq!(fourth.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(fourth.headers().get("Retry-After").is_some());
    let body = body_json(fourth).await;
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn one_shot_analyze_bypasses_storage() {
    let app = build_router(support::test_state(100, Environment::Production));
    let session_id = Uuid::new_v4();

    let request = json_request(
        Method::POST,
        "/api/v1/analyze",
        json!({
            "sessionId": session_id,
            "signals": [{"type": "device", "timestamp": 1_700_000_000_000i64, "payload": {"userAgent": "Mozilla/5.0 Chrome/120.0"}}],
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["sessionId"], session_id.to_string());

    // Nothing was persisted against the same state: /analysis for this session still 404s.
    let lookup = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/analysis"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn debug_endpoint_only_mounted_in_development() {
    let session_id = Uuid::new_v4();

    let prod_app = build_router(support::test_state(100, Environment::Production));
    let prod_response = prod_app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/debug/sessions/{session_id}/signals"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(prod_response.status(), StatusCode::NOT_FOUND);

    let dev_app = build_router(support::test_state(100, Environment::Development));
    let dev_response = dev_app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/debug/sessions/{session_id}/signals"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // Unknown session still 404s through the normal error taxonomy, but the
    // route itself exists (unlike production, where the whole path 404s at
    // the router level before a handler ever runs).
    assert_eq!(dev_response.status(), StatusCode::NOT_FOUND);
    let body = body_json(dev_response).await;
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn get_session_and_list_client_sessions_round_trip() {
    let app = build_router(support::test_state(100, Environment::Production));

    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap().to_string();

    let get = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::OK);
    let get_body = body_json(get).await;
    assert_eq!(get_body["data"]["id"], session_id);
    assert_eq!(get_body["data"]["clientId"], "client-a");
    assert!(get_body["data"]["completedAt"].is_null());

    let list = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/clients/client-a/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let list_body = body_json(list).await;
    let sessions = list_body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], session_id);
}

#[tokio::test]
async fn list_client_sessions_honors_limit_query_param() {
    let app = build_router(support::test_state(100, Environment::Production));

    for _ in 0..3 {
        app.clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/sessions",
                json!({"clientId": "client-b", "deviceFingerprint": "fp-1"}),
            ))
            .await
            .unwrap();
    }

    let list = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/clients/client-b/sessions?limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let body = body_json(list).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn headless_chrome_with_swiftshader_triggers_review_or_block() {
    let app = build_router(support::test_state(100, Environment::Production));

    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap().to_string();

    let signals = json!({
        "sessionId": session_id,
        "signals": [
            {
                "type": "device",
                "timestamp": 1_700_000_000_000i64,
                "payload": {
                    "userAgent": "Mozilla/5.0 HeadlessChrome/120.0",
                    "webdriver": true,
                    "pluginCount": 0,
                },
            },
            {
                "type": "fingerprint",
                "timestamp": 1_700_000_000_001i64,
                "payload": {
                    "canvas": "",
                    "webgl": "0",
                    "webglRenderer": "SwiftShader",
                },
            },
        ],
    });
    let ingest = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/sessions/{session_id}/signals"),
            signals,
        ))
        .await
        .unwrap();
    assert_eq!(ingest.status(), StatusCode::OK);

    let complete = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/sessions/{session_id}/complete"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(complete.status(), StatusCode::OK);
    let complete_body = body_json(complete).await;
    assert_eq!(complete_body["data"]["analysisAvailable"], true);

    let analysis = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/analysis"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(analysis.status(), StatusCode::OK);
    let body = body_json(analysis).await;
    let factors = body["data"]["riskFactors"].as_array().unwrap();
    let names: Vec<&str> = factors.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"bot_signature_detected"));
    assert!(names.contains(&"headless_browser_detected"));
    let confidence = body["data"]["confidenceScore"].as_f64().unwrap();
    assert!(confidence >= 0.5, "confidence {confidence} should be >= 0.5");
    let verdict = body["data"]["verdict"].as_str().unwrap();
    assert!(verdict == "REVIEW" || verdict == "BLOCK");
}

#[tokio::test]
async fn normal_chrome_produces_no_bot_or_headless_factors() {
    let app = build_router(support::test_state(100, Environment::Production));

    let create = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sessions",
            json!({"clientId": "client-a", "deviceFingerprint": "fp-1"}),
        ))
        .await
        .unwrap();
    let created = body_json(create).await;
    let session_id = created["data"]["sessionId"].as_str().unwrap().to_string();

    let signals = json!({
        "sessionId": session_id,
        "signals": [
            {
                "type": "device",
                "timestamp": 1_700_000_000_000i64,
                "payload": {
                    "userAgent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36",
                    "webdriver": false,
                    "pluginCount": 5,
                },
            },
            {
                "type": "fingerprint",
                "timestamp": 1_700_000_000_001i64,
                "payload": {
                    "canvas": "a1b2c3d4e5f6",
                    "webgl": "1",
                    "webglRenderer": "NVIDIA GeForce RTX 3080",
                    "audio": "f1e2d3c4",
                },
            },
        ],
    });
    app.clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/sessions/{session_id}/signals"),
            signals,
        ))
        .await
        .unwrap();

    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/sessions/{session_id}/complete"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let analysis = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/analysis"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(analysis.status(), StatusCode::OK);
    let body = body_json(analysis).await;
    let factors = body["data"]["riskFactors"].as_array().unwrap();
    assert!(factors.iter().all(|f| f["name"] != "bot_signature_detected"));
    assert!(factors.iter().all(|f| f["name"] != "headless_browser_detected"));
    assert_eq!(body["data"]["verdict"], "ALLOW");
}
