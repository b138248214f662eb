//! チャット補完ゲートウェイ連携
//!
//! 画像1枚＋指示文を送り、応答テキストを受け取るだけの境界。
//! テストではこのトレイトを差し替える。

mod client;

pub use client::GatewayClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI_GATEWAY_API_KEY is not configured")]
    MissingApiKey,

    /// 補完サービスが失敗ステータスを返した
    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

/// 画像付きの補完リクエスト
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Data URL または画像URL
    pub image_url: String,
    pub max_tokens: u32,
}

#[async_trait::async_trait]
pub trait VisionModel: Send + Sync {
    /// 応答テキストを返す（前後の空白は除去済み）
    async fn complete(&self, request: &VisionRequest) -> Result<String, GatewayError>;
}
