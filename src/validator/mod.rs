//! 画像判定パイプライン
//!
//! 3段階の補完呼び出しを順番に実行する:
//! - Stage1 (分類): 撮影アングルを判定
//! - Stage2 (品質): ブレ・シャープネスを採点
//! - Stage3 (属性): メーカー・車種・色・損傷を抽出
//!
//! 各ステージは前のステージの完了を待ってから開始する。
//! どこかで補完サービスが失敗ステータスを返したら、その時点で全体を失敗にする。

mod stage;

pub use stage::Stage;

use crate::error::{Result, ValidatorError};
use crate::gateway::{GatewayError, VisionModel, VisionRequest};
use car_view_common::{
    parse_analysis_reply, parse_quality_reply, parse_view_reply, prompts, QualityReport,
    ValidationResult, VehicleAnalysis, Verdict, ViewType,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// アングル判定の差し替え可能な境界
#[async_trait::async_trait]
pub trait ViewClassifier: Send + Sync {
    async fn classify_view(&self, image: &str, expected: ViewType) -> Result<ValidationResult>;
}

/// 期待アングルの妥当性チェック
pub fn parse_view(value: &str) -> Result<ViewType> {
    value
        .parse()
        .map_err(|e| ValidatorError::InvalidView(format!("{}: {}", value, e)))
}

/// 補完ゲートウェイを使う3段階パイプライン
#[derive(Clone)]
pub struct GatewayValidator {
    model: Arc<dyn VisionModel>,
}

impl GatewayValidator {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    async fn run_stage(&self, stage: Stage, request: VisionRequest) -> Result<String> {
        debug!(stage = stage.name(), max_tokens = request.max_tokens, "calling gateway");

        self.model.complete(&request).await.map_err(|e| match e {
            GatewayError::Status { status, body } => {
                warn!(stage = stage.name(), status, body = %body, "stage failed");
                ValidatorError::StageFailed {
                    stage: stage.failure_message(),
                    status,
                }
            }
            GatewayError::MissingApiKey => ValidatorError::MissingApiKey,
            other => ValidatorError::ApiCall(other.to_string()),
        })
    }

    /// Stage1: 分類
    ///
    /// 解釈できない応答は unknown として扱う
    async fn classify(&self, image: &str) -> Result<ViewType> {
        let reply = self
            .run_stage(
                Stage::Classification,
                VisionRequest {
                    system_prompt: prompts::classify_system_prompt(),
                    user_prompt: prompts::CLASSIFY_USER_PROMPT.into(),
                    image_url: image.into(),
                    max_tokens: prompts::CLASSIFY_MAX_TOKENS,
                },
            )
            .await?;

        Ok(parse_view_reply(&reply).unwrap_or_else(|e| {
            warn!(reply = %reply, error = %e, "unrecognized view label, treating as unknown");
            ViewType::Unknown
        }))
    }

    /// Stage2: 品質評価
    async fn assess_quality(&self, image: &str) -> Result<QualityReport> {
        let reply = self
            .run_stage(
                Stage::Quality,
                VisionRequest {
                    system_prompt: prompts::QUALITY_SYSTEM_PROMPT.into(),
                    user_prompt: prompts::QUALITY_USER_PROMPT.into(),
                    image_url: image.into(),
                    max_tokens: prompts::QUALITY_MAX_TOKENS,
                },
            )
            .await?;

        Ok(parse_quality_reply(&reply).unwrap_or_else(|e| {
            warn!(reply = %reply, error = %e, "failed to parse quality JSON, using fallback");
            QualityReport::fallback()
        }))
    }

    /// Stage3: 属性解析
    async fn analyze_vehicle(&self, image: &str, expected: ViewType) -> Result<VehicleAnalysis> {
        let reply = self
            .run_stage(
                Stage::Analysis,
                VisionRequest {
                    system_prompt: prompts::ANALYSIS_SYSTEM_PROMPT.into(),
                    user_prompt: prompts::analysis_user_prompt(expected),
                    image_url: image.into(),
                    max_tokens: prompts::ANALYSIS_MAX_TOKENS,
                },
            )
            .await?;

        Ok(parse_analysis_reply(&reply).unwrap_or_else(|e| {
            warn!(reply = %reply, error = %e, "failed to parse analysis JSON, using fallback");
            VehicleAnalysis::fallback()
        }))
    }
}

#[async_trait::async_trait]
impl ViewClassifier for GatewayValidator {
    async fn classify_view(&self, image: &str, expected: ViewType) -> Result<ValidationResult> {
        let detected = self.classify(image).await?;
        let quality = self.assess_quality(image).await?;
        let analysis = self.analyze_vehicle(image, expected).await?;

        info!(expected = %expected, detected = %detected, "view classified");

        let verdict = Verdict::evaluate(detected, expected);
        Ok(ValidationResult {
            detected_view: detected,
            expected_view: expected,
            is_match: verdict.is_match,
            confidence: verdict.confidence,
            analysis: Some(analysis),
            quality: Some(quality),
        })
    }
}
