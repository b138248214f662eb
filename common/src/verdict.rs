//! 一致判定と信頼度
//!
//! 信頼度はモデルが出す確率ではなく、一致/不一致/判定不能で決まる固定値

use crate::types::ViewType;

/// 判定不能（unknown）時の信頼度
pub const CONFIDENCE_UNKNOWN: f64 = 0.0;
/// 一致時の信頼度
pub const CONFIDENCE_MATCH: f64 = 0.95;
/// 不一致時の信頼度
pub const CONFIDENCE_MISMATCH: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_match: bool,
    pub confidence: f64,
}

impl Verdict {
    /// 検出アングルと期待アングルから判定する
    ///
    /// left_side / right_side は side とは別ラベルとして扱う
    pub fn evaluate(detected: ViewType, expected: ViewType) -> Self {
        let is_match = detected == expected;
        let confidence = if detected.is_unknown() {
            CONFIDENCE_UNKNOWN
        } else if is_match {
            CONFIDENCE_MATCH
        } else {
            CONFIDENCE_MISMATCH
        };

        Self { is_match, confidence }
    }
}
