//! テスト用の差し替え実装

#![allow(dead_code)]

use car_view::gateway::{GatewayError, VisionModel, VisionRequest};
use std::collections::VecDeque;
use std::sync::Mutex;

/// 決められた応答を順に返すモデル
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<VisionRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 分類・品質・属性の3応答がすべて成功するモデル
    pub fn replying(view: &str, quality: &str, analysis: &str) -> Self {
        Self::new(vec![
            Ok(view.to_string()),
            Ok(quality.to_string()),
            Ok(analysis.to_string()),
        ])
    }

    pub fn calls(&self) -> Vec<VisionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl VisionModel for ScriptedModel {
    async fn complete(&self, request: &VisionRequest) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("no scripted reply left".into())))
    }
}

pub const GOOD_QUALITY: &str =
    r#"{"qualityScore": 91, "isBlurry": false, "sharpness": "High", "issues": "None"}"#;

pub const FORD_ANALYSIS: &str = r#"```json
{"make": "Ford", "model": "F-150", "color": "Silver", "condition": "Good",
 "damage": "None visible", "features": "Chrome grille"}
```"#;

pub const SAMPLE_IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

pub fn status_error(status: u16) -> GatewayError {
    GatewayError::Status {
        status,
        body: "upstream said no".into(),
    }
}
