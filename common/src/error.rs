//! エラー型定義

use thiserror::Error;

/// AI応答のパース失敗
///
/// 品質・属性ステージではフォールバック値に置き換えるため、
/// リクエスト全体のエラーにはならない
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty reply")]
    Empty,

    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("unrecognized view label: {0}")]
    UnknownLabel(String),
}
