//! プロンプト生成モジュール
//!
//! 3ステージそれぞれのシステムプロンプトとユーザー指示文:
//! - 分類: 撮影アングルを1語で回答させる
//! - 品質: ブレ・ピントをJSONで評価させる
//! - 属性: メーカー・車種・色・状態をJSONで抽出させる

use crate::types::ViewType;

/// 分類ステージの最大トークン数
pub const CLASSIFY_MAX_TOKENS: u32 = 10;
/// 品質ステージの最大トークン数
pub const QUALITY_MAX_TOKENS: u32 = 200;
/// 属性解析ステージの最大トークン数
pub const ANALYSIS_MAX_TOKENS: u32 = 500;

/// 分類ステージのシステムプロンプト
pub fn classify_system_prompt() -> String {
    let labels = ViewType::CLASSIFIER_LABELS
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an automotive image classifier. Analyze car images and determine the view angle.

Respond with ONLY one of these exact view types:
- "front" - front view of the car showing headlights, grille, front bumper
- "back" - rear view showing taillights, rear bumper, license plate area
- "side" - side profile of the car (either left or right side is acceptable)
- "top" - top-down view of the car showing roof, hood, trunk

If the image is unclear, damaged, or doesn't show a car, respond with "unknown".

Allowed answers: {labels}
Respond with only the view type, nothing else."#
    )
}

pub const CLASSIFY_USER_PROMPT: &str = "What view angle is this car image showing?";

/// 品質ステージのシステムプロンプト
pub const QUALITY_SYSTEM_PROMPT: &str = r#"You are an automotive image quality expert specializing in vehicle inspection photos.

Analyze the image for:
1. Motion blur or camera shake - Check if car edges, text, or details are blurred from movement
2. Focus quality - Is the car in sharp focus?
3. Clarity - Are fine details like badges, trim, and body lines clearly visible?
4. Overall suitability for vehicle damage inspection

Respond ONLY with valid JSON (no markdown, no code blocks):
{
  "qualityScore": 85,
  "isBlurry": false,
  "sharpness": "High/Medium/Low",
  "issues": "Specific issues found"
}

Quality scoring guidelines:
- 85-100: Excellent - Sharp, clear, no blur, suitable for detailed inspection
- 70-84: Good - Minor softness but details visible, acceptable for inspection
- 50-69: Fair - Noticeable blur or shake, some details unclear, marginal for inspection
- Below 50: Poor - Significant blur/shake/motion, not suitable for inspection

Be strict: If there's any motion blur, camera shake, or the car isn't in sharp focus, score below 70."#;

pub const QUALITY_USER_PROMPT: &str =
    "Analyze the quality of this image. Is it clear and sharp enough for vehicle inspection?";

/// 属性解析ステージのシステムプロンプト
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert automotive analyst. Analyze the car image and provide detailed information.

Respond in the following JSON format:
{
  "make": "Car manufacturer",
  "model": "Car model (if identifiable)",
  "color": "Primary color",
  "condition": "Overall condition (Excellent/Good/Fair/Poor)",
  "damage": "Any visible damage or issues",
  "features": "Notable features or characteristics"
}

If information cannot be determined, use "Unknown" or "Not visible"."#;

/// 属性解析ステージの指示文（期待アングルを含める）
pub fn analysis_user_prompt(expected: ViewType) -> String {
    format!(
        "Analyze this {} view of a car and provide detailed information.",
        expected.label()
    )
}
