//! 判定結果の型定義
//!
//! リレーサーバーとクライアントで共有される型:
//! - ViewType: 撮影アングル
//! - QualityReport: 品質ステージの出力
//! - VehicleAnalysis: 属性解析ステージの出力
//! - ValidationResult: 最終出力（3ステージをまとめたもの）
//! - RelayRequest / ErrorBody: リレーエンドポイントの入出力

use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 撮影アングル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Front,
    Back,
    Side,
    LeftSide,
    RightSide,
    Top,
    Unknown,
}

impl ViewType {
    /// 分類ステージが返しうるラベル
    pub const CLASSIFIER_LABELS: &'static [ViewType] = &[
        ViewType::Front,
        ViewType::Back,
        ViewType::Side,
        ViewType::Top,
        ViewType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Front => "front",
            ViewType::Back => "back",
            ViewType::Side => "side",
            ViewType::LeftSide => "left_side",
            ViewType::RightSide => "right_side",
            ViewType::Top => "top",
            ViewType::Unknown => "unknown",
        }
    }

    /// 表示用ラベル（"left_side" → "left side"）
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ViewType::Unknown)
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = ParseError;

    /// 大文字小文字・前後の空白・引用符・末尾の句読点を無視してパース
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
            .trim()
            .to_lowercase()
            .replace(['-', ' '], "_");

        match cleaned.as_str() {
            "" => Err(ParseError::Empty),
            "front" => Ok(ViewType::Front),
            "back" => Ok(ViewType::Back),
            "side" => Ok(ViewType::Side),
            "left_side" => Ok(ViewType::LeftSide),
            "right_side" => Ok(ViewType::RightSide),
            "top" => Ok(ViewType::Top),
            "unknown" => Ok(ViewType::Unknown),
            _ => Err(ParseError::UnknownLabel(s.trim().to_string())),
        }
    }
}

/// 品質ステージの結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    #[serde(deserialize_with = "score_from_number")]
    pub quality_score: u8,
    pub is_blurry: bool,
    #[serde(default)]
    pub sharpness: String,
    #[serde(default)]
    pub issues: String,
}

impl QualityReport {
    /// 応答がパースできない場合に差し替える固定値
    pub fn fallback() -> Self {
        Self {
            quality_score: 50,
            is_blurry: true,
            sharpness: "Low".into(),
            issues: "Could not analyze quality".into(),
        }
    }
}

/// 属性解析ステージの結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleAnalysis {
    #[serde(default = "unknown_field")]
    pub make: String,
    #[serde(default = "unknown_field")]
    pub model: String,
    #[serde(default = "unknown_field")]
    pub color: String,
    #[serde(default = "unknown_field")]
    pub condition: String,
    #[serde(default = "not_visible_field", deserialize_with = "text_or_list")]
    pub damage: String,
    #[serde(default = "not_visible_field", deserialize_with = "text_or_list")]
    pub features: String,
}

impl VehicleAnalysis {
    /// 応答がパースできない場合に差し替える固定値
    pub fn fallback() -> Self {
        Self {
            make: "Unknown".into(),
            model: "Unknown".into(),
            color: "Unknown".into(),
            condition: "Unknown".into(),
            damage: "Analysis failed".into(),
            features: "Could not analyze".into(),
        }
    }
}

fn unknown_field() -> String {
    "Unknown".into()
}

fn not_visible_field() -> String {
    "Not visible".into()
}

/// 0-100 にクランプしたスコア（小数は四捨五入）
fn score_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("qualityScore must be a finite number"));
    }
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

/// モデルが配列で返すことがあるため、文字列にまとめる
fn text_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrList {
        Text(String),
        List(Vec<String>),
    }

    Ok(match TextOrList::deserialize(deserializer)? {
        TextOrList::Text(text) => text,
        TextOrList::List(items) => items.join(", "),
    })
}

/// 1枚の画像に対する判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub detected_view: ViewType,
    pub expected_view: ViewType,
    pub is_match: bool,
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<VehicleAnalysis>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
}

/// リレーエンドポイントへのリクエスト
///
/// 欠落判定はハンドラ側で行うため両方Option
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub expected_view: Option<String>,
}

impl RelayRequest {
    pub fn new(image_base64: impl Into<String>, expected_view: ViewType) -> Self {
        Self {
            image_base64: Some(image_base64.into()),
            expected_view: Some(expected_view.as_str().to_string()),
        }
    }
}

/// エラーレスポンス本体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
