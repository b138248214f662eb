//! AI応答パーサー
//!
//! チャット補完の応答テキストから各ステージの結果を取り出す。
//! 失敗は `ParseError` として返し、フォールバック値への差し替えは呼び出し側が行う:
//! - 分類: 解釈できないラベル → `ViewType::Unknown`
//! - 品質: `QualityReport::fallback()`
//! - 属性: `VehicleAnalysis::fallback()`

use crate::error::ParseError;
use crate::types::{QualityReport, VehicleAnalysis, ViewType};
use regex::Regex;
use serde::de::DeserializeOwned;

/// コードフェンス（```json / ```）を取り除く
///
/// # Examples
/// ```
/// use car_view_common::strip_code_fences;
///
/// let reply = "```json\n{\"make\": \"Ford\"}\n```";
/// assert_eq!(strip_code_fences(reply), "{\"make\": \"Ford\"}");
/// ```
pub fn strip_code_fences(reply: &str) -> String {
    lazy_static::lazy_static! {
        static ref JSON_FENCE_RE: Regex = Regex::new(r"```json\s*").unwrap();
        static ref FENCE_RE: Regex = Regex::new(r"```\s*").unwrap();
    }

    let without_json = JSON_FENCE_RE.replace_all(reply.trim(), "");
    FENCE_RE.replace_all(&without_json, "").trim().to_string()
}

/// 分類ステージの応答をパース
///
/// 応答の1行目だけを見る
pub fn parse_view_reply(reply: &str) -> Result<ViewType, ParseError> {
    let first_line = reply.trim().lines().next().unwrap_or_default();
    first_line.parse()
}

/// 品質ステージの応答をパース
pub fn parse_quality_reply(reply: &str) -> Result<QualityReport, ParseError> {
    parse_json_reply(reply)
}

/// 属性解析ステージの応答をパース
pub fn parse_analysis_reply(reply: &str) -> Result<VehicleAnalysis, ParseError> {
    parse_json_reply(reply)
}

fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, ParseError> {
    let json_str = strip_code_fences(reply);
    if json_str.is_empty() {
        return Err(ParseError::Empty);
    }
    serde_json::from_str(&json_str).map_err(|e| ParseError::InvalidJson(e.to_string()))
}
