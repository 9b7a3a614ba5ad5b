//! HTTP router construction.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/groups", get(api::list_groups).post(api::create_group))
        .route("/groups/{id}", get(api::get_group))
        .route("/groups/{id}/analysis", get(api::analyze_group))
        .route("/average/{color}", get(api::average_by_color))
        .route("/notifications", get(api::notifications))
        .route("/notifications/delayed", get(api::delayed))
        .route("/notifications/early", get(api::early))
        .route("/latest-group-times", get(api::latest_group_times))
        .route("/summary", get(api::summary))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api status=ok method={method} path={path} http_status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
