use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::{
    error::INTERNAL_ERROR_MESSAGE,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::uploads::UPLOADS_ROUTE,
};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.root());
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/analyze", post(handlers::analyze))
        .route("/result/top", get(handlers::result_top))
        .route("/result/bottom", get(handlers::result_bottom))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Turns a handler panic into the same opaque 500 body as any internal error
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({
            "success": false,
            "error": INTERNAL_ERROR_MESSAGE,
        })),
    )
        .into_response()
}
