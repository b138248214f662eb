//! HTTPエラーレスポンス
//!
//! 本体は常に `{"error": "..."}`

use crate::error::ValidatorError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use car_view_common::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 不正なリクエスト (400)
    #[error("{0}")]
    BadRequest(String),

    /// ステージ失敗・想定外の失敗 (500)
    #[error("{0}")]
    Internal(String),
}

impl From<ValidatorError> for ApiError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::InvalidView(msg) => {
                ApiError::BadRequest(format!("Invalid expectedView: {}", msg))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
