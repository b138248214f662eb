//! リレーエンドポイント（HTTPサーバー）
//!
//! POST /classify-car-view に `{imageBase64, expectedView}` を受け取り、
//! `ValidationResult` か `{error}` を返す。CORSは全開放。

mod error;
mod routes;

pub use error::{ApiError, ApiResult};

use crate::validator::ViewClassifier;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Data URLの画像を受けるため既定の2MBより広げる
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ViewClassifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn ViewClassifier>) -> Self {
        Self { classifier }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/classify-car-view", post(routes::classify_car_view))
        .route("/functions/v1/classify-car-view", post(routes::classify_car_view))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 指定アドレスで待ち受ける
pub async fn serve(bind_address: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await
}
