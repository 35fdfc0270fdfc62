//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/export` - Export jobs
//! - `/api/import` - Import jobs
//! - `/api/health` - Health checks
//! - `/` - Static file serving (frontend)

pub mod health;
pub mod jobs;
pub mod static_files;

use axum::{body::Body, http::Response, response::IntoResponse, routing::any, Router};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

use crate::middleware::{
    apply_security_headers, cors_layer, make_request_span, propagate_request_id_layer,
    set_request_id_layer,
};
use crate::models::AppState;
use crate::types::AppError;

/// Create the main application router
///
/// API routes take precedence over static files. Unknown `/api/*` paths get
/// a JSON 404 instead of the frontend.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);
    let static_dir = state.config.server.static_dir.clone();

    let api_router = Router::new()
        .merge(jobs::router(state))
        .merge(health::router())
        .route("/api/{*path}", any(api_not_found));

    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(static_dir.as_deref()))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(propagate_request_id_layer())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors),
        );

    apply_security_headers(router)
}

async fn api_not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
