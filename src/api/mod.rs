//! HTTP surface of the dashboard.
//!
//! Endpoints:
//! - GET /health           - Liveness check
//! - GET /years            - Distinct years
//! - GET /neighborhoods    - Distinct normalized neighborhoods
//! - GET /summary          - Totals and top 5 (`?year=`)
//! - GET /atendimentos-ano - Visits per year (`?bairros=a,b`)
//! - GET /top-bairros      - Top 5 neighborhoods (`?year=`)
//! - GET /table            - Year-over-year table (`?year=&bairros=`)

pub mod error;
pub mod handlers;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::api::error::ApiError;
use crate::dataset::Dataset;

/// State shared by every handler. The dataset is never mutated after load.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

/// Builds the router. When `static_dir` is set, unmatched paths are served
/// from that directory (the dashboard front-end).
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/years", get(handlers::years))
        .route("/neighborhoods", get(handlers::neighborhoods))
        .route("/summary", get(handlers::summary))
        .route("/atendimentos-ano", get(handlers::visits_per_year))
        .route("/top-bairros", get(handlers::top_neighborhoods))
        .route("/table", get(handlers::table));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(
                    CorsLayer::new()
                        .allow_origin(AnyOrigin)
                        .allow_methods(AnyOrigin)
                        .allow_headers(AnyOrigin),
                ),
        )
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");
    ApiError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
