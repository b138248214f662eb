//! リモートのリレーエンドポイントを呼ぶクライアント
//!
//! `ViewClassifier` を実装しているので、プロセス内パイプラインと差し替えられる

use crate::error::{Result, ValidatorError};
use crate::validator::ViewClassifier;
use car_view_common::{ErrorBody, RelayRequest, ValidationResult, ViewType};
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ValidatorError::ApiCall(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl ViewClassifier for RelayClient {
    async fn classify_view(&self, image: &str, expected: ViewType) -> Result<ValidationResult> {
        let resp = self
            .client
            .post(&self.url)
            .json(&RelayRequest::new(image, expected))
            .send()
            .await
            .map_err(|e| ValidatorError::ApiCall(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ValidatorError::ApiCall(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(ValidatorError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
