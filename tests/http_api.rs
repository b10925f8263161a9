//! HTTP surface: routing, status codes, response shapes.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use phish_shield::config::Config;
use phish_shield::logic::scoring::ScoringService;
use phish_shield::{create_router, AppState};

fn test_config() -> Config {
    let models = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models");
    Config {
        model_path: models.join("url_model.json"),
        overrides_path: models.join("overrides.json"),
        ..Default::default()
    }
}

fn state_for(config: Config) -> AppState {
    let scoring = ScoringService::from_sources(config.sources(), config.scoring()).unwrap();
    AppState {
        scoring: Arc::new(scoring),
        config,
    }
}

fn app() -> Router {
    create_router(state_for(test_config()))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_model() {
    let (status, body) = send(app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "url-gbdt-demo");
    assert!(body["timestamp"].as_i64().is_some());
}

#[tokio::test]
async fn check_safe_url() {
    let (status, body) = send(app(), post_json("/check", json!({ "url": "https://www.google.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSafe"], true);
    assert_eq!(body["isPhishing"], false);
    assert_eq!(body["label"], "safe");
    assert_eq!(body["riskScore"], 0.0);
    assert_eq!(body["source"], "model");
    assert_eq!(body["status"], "parsed");
    assert_eq!(body["hostname"], "www.google.com");
    assert!(body["requestId"].as_str().is_some());
}

#[tokio::test]
async fn check_override_url() {
    let (status, body) =
        send(app(), post_json("/check", json!({ "url": "http://testsafebrowsing.appspot.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPhishing"], true);
    assert_eq!(body["confidence"], 92.0);
    assert_eq!(body["source"], "override");
}

#[tokio::test]
async fn check_malformed_url_is_scored() {
    let (status, body) = send(app(), post_json("/check", json!({ "url": "not a url" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "malformed");
    assert_eq!(body["hostname"], "");
}

#[tokio::test]
async fn check_rejects_empty_and_missing_url() {
    for payload in [json!({ "url": "" }), json!({ "url": "   " }), json!({})] {
        let (status, body) = send(app(), post_json("/check", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "No URL provided");
    }
}

#[tokio::test]
async fn features_endpoint_lists_named_values() {
    let (status, body) =
        send(app(), post_json("/api/v1/features", json!({ "url": "http://192.168.0.1/login" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"]["IpAddress"], 1.0);
    assert_eq!(body["features"]["NoHttps"], 1.0);
    assert_eq!(body["features"]["NumNumericChars"], 8.0);
    assert_eq!(body["features"].as_object().map(|m| m.len()), Some(48));
    assert_eq!(body["feature_version"], 1);

    let leaves = body["tree_contributions"].as_array().unwrap();
    assert_eq!(leaves.len(), 5);
    let raw: f64 = leaves.iter().filter_map(Value::as_f64).sum();
    assert!((raw - 2.7).abs() < 1e-4);
}

#[tokio::test]
async fn model_info() {
    let (status, body) = send(app(), Request::get("/api/v1/model").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "url-gbdt-demo");
    assert_eq!(body["tree_count"], 5);
    assert_eq!(body["link"], "sigmoid");
    assert_eq!(body["feature_count"], 48);
    assert_eq!(body["override_count"], 1);
    assert_eq!(body["phishing_threshold"], 0.5);
    assert_eq!(body["max_depth"], 3);
    assert_eq!(
        body["split_features"],
        json!(["SubdomainLevel", "UrlLength", "NumDash", "AtSymbol", "NoHttps", "IpAddress", "NumSensitiveWords"])
    );
}

#[tokio::test]
async fn admin_routes_absent_when_disabled() {
    let config = Config { admin_api: false, ..test_config() };
    let app = create_router(state_for(config));

    let (status, _) = send(app.clone(), Request::get("/api/v1/model").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(app.clone(), post_json("/api/v1/model/reload", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app, post_json("/check", json!({ "url": "https://www.google.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "safe");
}

#[tokio::test]
async fn cors_only_on_public_routes() {
    let check = Request::post("/check")
        .header(header::ORIGIN, "chrome-extension://abc")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "url": "https://www.google.com" }).to_string()))
        .unwrap();
    let res = app().oneshot(check).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let reload = Request::post("/api/v1/model/reload")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(reload).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

    let preflight = Request::options("/api/v1/model/reload")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(preflight).await.unwrap();
    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn reload_failure_keeps_serving() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let bundled = test_config().model_path;
    std::fs::copy(&bundled, &model_path).unwrap();

    let config = Config { model_path: model_path.clone(), ..test_config() };
    let app = create_router(state_for(config));

    let (status, body) = send(app.clone(), post_json("/api/v1/model/reload", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "url-gbdt-demo");

    std::fs::write(&model_path, br#"{"format_version": 99}"#).unwrap();
    let (status, _) = send(app.clone(), post_json("/api/v1/model/reload", json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(app, post_json("/check", json!({ "url": "https://www.google.com" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "safe");
}

#[test]
fn health_handler_direct() {
    let state = state_for(test_config());
    let res = tokio_test::block_on(phish_shield::handlers::health::check(State(state)));
    assert_eq!(res.0.model, "url-gbdt-demo");
    assert_eq!(res.0.status, "healthy");
}
