#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, ETAG};
use axum::http::{Method, Request, StatusCode};
use folio_event_bus::EventBus;
use folio_kernel::domain::config::{ApiConfig, LayoutStoreKind};
use folio_kernel::security::{AccessError, AccessPolicy, Principal};
use folio_kernel::server::ApiState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN: &str = "Bearer letmein";

#[derive(Debug)]
struct SingleToken;

impl AccessPolicy for SingleToken {
    fn authorize(&self, token: &str) -> Result<Principal, AccessError> {
        if token == "letmein" {
            Ok(Principal::new("admin"))
        } else {
            Err(AccessError::Forbidden { message: "unknown token".into(), context: None })
        }
    }
}

async fn app() -> Router {
    let mut config = ApiConfig::default();
    config.homepage.store = LayoutStoreKind::Memory;
    let events = EventBus::new();
    let (_, slice) = folio_homepage::init(&config.homepage, None, &events).await.unwrap();

    let state = ApiState::builder()
        .config(config)
        .events(events)
        .access(Arc::new(SingleToken))
        .register_slice(slice)
        .build()
        .unwrap();
    let (router, _) = folio_homepage::api::router().split_for_parts();
    router.with_state(state)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        request = request.header(AUTHORIZATION, value);
    }
    let body = match body {
        Some(json) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        },
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let etag = response.headers().get(ETAG).map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, etag, json)
}

fn sections(value: &Value) -> Vec<Value> {
    value["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| json!({ "id": s["id"], "order": s["order"], "visible": s["visible"] }))
        .collect()
}

#[tokio::test]
async fn catalog_lists_sections_in_natural_order() {
    let app = app().await;
    let (status, _, body) = call(&app, Method::GET, "/homepage/catalog", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0], json!({ "id": "hero", "label": "Hero", "required": true }));
    assert_eq!(entries[2]["label"], "About Us");
}

#[tokio::test]
async fn layout_is_public_and_tagged_with_version() {
    let app = app().await;
    let (status, etag, body) = call(&app, Method::GET, "/homepage/layout", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(etag.as_deref(), Some("\"1\""));
    assert_eq!(body["version"], 1);
    assert!(body["updatedAt"].is_string());
    assert_eq!(body["sections"][0]["required"], true);
    assert_eq!(body["sections"][6]["id"], "contact");
}

#[tokio::test]
async fn commit_requires_administrator() {
    let app = app().await;
    let (_, _, layout) = call(&app, Method::GET, "/homepage/layout", None, None).await;
    let request = json!({ "baseVersion": 1, "sections": sections(&layout) });

    let (status, _, body) =
        call(&app, Method::PUT, "/homepage/layout", None, Some(request.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthenticated");

    let (status, _, _) =
        call(&app, Method::PUT, "/homepage/layout", Some("Bearer nope"), Some(request)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn commit_then_stale_commit_conflicts() {
    let app = app().await;
    let (_, _, layout) = call(&app, Method::GET, "/homepage/layout", None, None).await;
    let mut candidate = sections(&layout);
    // Swap blog (order 6) with services (order 2).
    candidate[1]["order"] = json!(6);
    candidate[5]["order"] = json!(2);
    let request = json!({ "baseVersion": 1, "sections": candidate });

    let (status, etag, body) =
        call(&app, Method::PUT, "/homepage/layout", Some(ADMIN), Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(etag.as_deref(), Some("\"2\""));
    assert_eq!(body["version"], 2);
    assert_eq!(body["sections"][1]["id"], "blog");

    let (status, _, body) =
        call(&app, Method::PUT, "/homepage/layout", Some(ADMIN), Some(request)).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["kind"], "Conflict");
    assert_eq!(body["currentVersion"], 2);
}

#[tokio::test]
async fn invalid_candidate_reports_violation_kind() {
    let app = app().await;
    let (_, _, layout) = call(&app, Method::GET, "/homepage/layout", None, None).await;

    let mut hidden_hero = sections(&layout);
    hidden_hero[0]["visible"] = json!(false);
    let (status, _, body) = call(
        &app,
        Method::PUT,
        "/homepage/layout",
        Some(ADMIN),
        Some(json!({ "baseVersion": 1, "sections": hidden_hero })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "RequiredSectionHidden");

    let mut unknown = sections(&layout);
    unknown[3]["id"] = json!("pricing");
    let (status, _, body) = call(
        &app,
        Method::PUT,
        "/homepage/layout",
        Some(ADMIN),
        Some(json!({ "baseVersion": 1, "sections": unknown })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "UnknownOrMissingSection");

    let (_, etag, _) = call(&app, Method::GET, "/homepage/layout", None, None).await;
    assert_eq!(etag.as_deref(), Some("\"1\""));
}

#[tokio::test]
async fn extreme_order_is_an_ordering_violation() {
    let app = app().await;
    let (_, _, layout) = call(&app, Method::GET, "/homepage/layout", None, None).await;

    let mut candidate = sections(&layout);
    candidate[0]["order"] = json!(i64::MIN);
    let (status, _, body) = call(
        &app,
        Method::PUT,
        "/homepage/layout",
        Some(ADMIN),
        Some(json!({ "baseVersion": 1, "sections": candidate })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "InvalidOrdering");
}

async fn put_raw(app: &Router, content_type: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/homepage/layout")
        .header(AUTHORIZATION, ADMIN)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_owned()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn malformed_bodies_get_error_bodies() {
    let app = app().await;

    let (status, body) = put_raw(&app, "application/json", "{\"baseVersion\": 1,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "MalformedBody");

    let (status, body) = put_raw(&app, "application/json", r#"{"sections": []}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "InvalidBody");
    assert!(body["message"].as_str().unwrap().contains("baseVersion"));

    let wrong_order = r#"{"baseVersion": 1, "sections": [{"id": "hero", "order": "first", "visible": true}]}"#;
    let (status, body) = put_raw(&app, "application/json", wrong_order).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "InvalidBody");

    let (status, body) = put_raw(&app, "text/plain", "{}").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["kind"], "UnsupportedMediaType");
}

#[tokio::test]
async fn reset_commits_defaults() {
    let app = app().await;
    let (_, _, layout) = call(&app, Method::GET, "/homepage/layout", None, None).await;
    let mut candidate = sections(&layout);
    candidate[6]["visible"] = json!(false);
    call(
        &app,
        Method::PUT,
        "/homepage/layout",
        Some(ADMIN),
        Some(json!({ "baseVersion": 1, "sections": candidate })),
    )
    .await;

    let (status, _, body) = call(
        &app,
        Method::POST,
        "/homepage/layout/reset",
        Some(ADMIN),
        Some(json!({ "baseVersion": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 3);
    assert_eq!(body["sections"][6]["visible"], true);
}

#[tokio::test]
async fn renderer_view_lists_visible_sections() {
    let app = app().await;
    let (_, _, layout) = call(&app, Method::GET, "/homepage/layout", None, None).await;
    let mut candidate = sections(&layout);
    candidate[4]["visible"] = json!(false);
    call(
        &app,
        Method::PUT,
        "/homepage/layout",
        Some(ADMIN),
        Some(json!({ "baseVersion": 1, "sections": candidate })),
    )
    .await;

    let (status, _, body) = call(&app, Method::GET, "/homepage/sections", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], false);
    let ids: Vec<&str> =
        body["sections"].as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["hero", "services", "about", "projects", "blog", "contact"]);
}
