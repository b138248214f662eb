use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::validator::parse_view;
use axum::{body::Bytes, extract::State, Json};
use car_view_common::{extract_mime_type_from_data_url, RelayRequest, ValidationResult};
use serde_json::{json, Value};
use tracing::{debug, error};

const MISSING_FIELDS: &str = "Missing imageBase64 or expectedView";

/// POST /classify-car-view
pub async fn classify_car_view(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ValidationResult>> {
    let request: RelayRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let (image, expected) =
        required_fields(&request).ok_or_else(|| ApiError::BadRequest(MISSING_FIELDS.into()))?;

    let expected = parse_view(expected)?;

    debug!(
        expected = %expected,
        mime = extract_mime_type_from_data_url(image),
        image_chars = image.len(),
        "classify request"
    );

    let result = state
        .classifier
        .classify_view(image, expected)
        .await
        .map_err(|e| {
            error!(error = %e, "Error in classify-car-view");
            ApiError::from(e)
        })?;

    Ok(Json(result))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 空文字も欠落として扱う
fn required_fields(request: &RelayRequest) -> Option<(&str, &str)> {
    let image = request.image_base64.as_deref().filter(|s| !s.trim().is_empty())?;
    let expected = request.expected_view.as_deref().filter(|s| !s.trim().is_empty())?;
    Some((image, expected))
}
