//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod export;
mod proposal;
mod section;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method},
    routing::{get, patch, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TimeoutLayer::new(settings.server.request_timeout()))
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Proposal routes
        .route("/api/proposal", get(proposal::list_proposals))
        .route("/api/proposal/create", post(proposal::create_proposal))
        .route("/api/proposal/templates", get(proposal::list_templates))
        .route("/api/proposal/template", post(proposal::create_from_template))
        .route(
            "/api/proposal/{id}",
            get(proposal::get_proposal)
                .patch(proposal::rename_proposal)
                .delete(proposal::delete_proposal),
        )

        // Section routes
        .route(
            "/api/proposal/{id}/sections",
            patch(section::save_sections).post(section::add_section),
        )
        .route("/api/proposal/{id}/sections/reorder", post(section::reorder_sections))
        .route(
            "/api/proposal/{id}/sections/{section_id}",
            patch(section::update_section).delete(section::remove_section),
        )

        // Preview and export routes
        .route("/api/proposal/{id}/pages", get(export::get_pages))
        .route("/api/proposal/{id}/preview", post(export::preview_page))
        .route("/api/proposal/{id}/export", post(export::export_proposal))
        .route("/api/export/pdf", post(export::export_inline))

        // Apply middleware and state
        .layer(DefaultBodyLimit::max(settings.server.body_limit_bytes))
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let methods = [Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS];
    let headers = [header::CONTENT_TYPE, header::ACCEPT];

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .expose_headers([header::CONTENT_DISPOSITION])
            .max_age(Duration::from_secs(3600))
    }
}

/// Health check endpoint
async fn health_check(State(state): State<SharedState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "proposals": state.proposals.count().await
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState::default()), &Settings::default())
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, body: Value) -> Value {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/proposal/create", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["proposal"].clone()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["proposals"], 0);
    }

    #[tokio::test]
    async fn test_create_filters_incomplete_sections() {
        let app = app();
        let proposal = create(
            &app,
            json!({
                "title": "Q4 Plan",
                "sections": [
                    { "title": "Intro", "content": "Hello" },
                    { "title": "", "content": "orphan" },
                    { "title": "Scope" }
                ]
            }),
        )
        .await;

        assert_eq!(proposal["title"], "Q4 Plan");
        assert_eq!(proposal["sections"].as_array().unwrap().len(), 1);
        assert_eq!(proposal["sections"][0]["type"], "text");

        let response = app.oneshot(get_request("/api/proposal")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["proposals"][0]["sectionCount"], 1);
    }

    #[tokio::test]
    async fn test_create_from_template_and_unknown_template() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/proposal/template",
                json!({ "templateId": "template2" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["proposal"]["title"], "Template: Marketing Proposal");

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/proposal/template",
                json!({ "templateId": "template9" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_section_editing_flow() {
        let app = app();
        let proposal = create(
            &app,
            json!({ "title": "Plan", "sections": [{ "title": "A", "content": "a" }] }),
        )
        .await;
        let id = proposal["id"].as_str().unwrap().to_string();
        let first = proposal["sections"][0]["id"].as_str().unwrap().to_string();

        // Removing the only section is refused
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/api/proposal/{}/sections/{}", id, first))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/proposal/{}/sections", id),
                json!({ "type": "list" }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["section"]["title"], "New List Section");
        assert_eq!(body["section"]["order"], 1);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/proposal/{}/sections/reorder", id),
                json!({ "from": 1, "to": 0 }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["proposal"]["sections"][0]["type"], "list");
        assert_eq!(body["proposal"]["sections"][1]["id"], first.as_str());

        let response = app
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/proposal/{}/sections/{}", id, first),
                json!({ "content": "updated" }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["section"]["content"], "updated");
        assert_eq!(body["section"]["title"], "A");
    }

    #[tokio::test]
    async fn test_bulk_save_cannot_empty_proposal() {
        let app = app();
        let proposal = create(
            &app,
            json!({
                "title": "Plan",
                "sections": [
                    { "title": "A", "content": "a" },
                    { "title": "B", "content": "b" }
                ]
            }),
        )
        .await;
        let id = proposal["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/proposal/{}/sections", id),
                json!({ "sections": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

        let response = app
            .oneshot(get_request(&format!("/api/proposal/{}", id)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["proposal"]["sections"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rename_validation() {
        let app = app();
        let proposal = create(&app, json!({})).await;
        let id = proposal["id"].as_str().unwrap();
        assert_eq!(proposal["title"], "Custom: New Proposal");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/proposal/{}", id),
                json!({ "title": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

        let response = app
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/proposal/{}", id),
                json!({ "title": "Renamed" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["proposal"]["title"], "Renamed");
    }

    #[tokio::test]
    async fn test_pages_and_preview() {
        let app = app();
        let long = "x".repeat(2800);
        let proposal = create(
            &app,
            json!({
                "title": "Plan",
                "sections": [
                    { "title": "A", "content": long },
                    { "title": "B", "content": "short" }
                ]
            }),
        )
        .await;
        let id = proposal["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/proposal/{}/pages", id)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["pages"][1]["content"][0]["title"], "B");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/proposal/{}/preview", id),
                json!({ "page": 2 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["previousPage"], 1);
        assert!(body.get("nextPage").is_none());
        assert_eq!(body["page"]["header"]["pageLabel"], "Page 2");
        assert_eq!(body["page"]["footer"]["companyName"], "Your Company Name");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/proposal/{}/preview", id),
                json!({ "page": 3 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/proposal/{}/preview", id),
                json!({ "page": 0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let app = app();
        let proposal = create(
            &app,
            json!({ "title": "Q4 Plan", "sections": [{ "title": "A", "content": "a" }] }),
        )
        .await;
        let id = proposal["id"].as_str().unwrap();

        let response = app
            .oneshot(json_request(
                Method::POST,
                &format!("/api/proposal/{}/export", id),
                json!({ "settings": { "format": "letter", "compress": false } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"Q4_Plan_"));
        assert!(disposition.ends_with(".pdf\""));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        let needle = b"/MediaBox [0 0 612 792]";
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[tokio::test]
    async fn test_inline_export_and_validation() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/export/pdf",
                json!({ "proposal": { "title": "Inline", "sections": [{ "title": "A", "content": "b" }] } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/export/pdf",
                json!({
                    "proposal": { "title": "Inline" },
                    "settings": { "margins": { "top": 200, "bottom": 200, "left": 20, "right": 20 } }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_proposal_is_not_found() {
        let id = uuid::Uuid::new_v4();
        let response = app()
            .oneshot(get_request(&format!("/api/proposal/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
