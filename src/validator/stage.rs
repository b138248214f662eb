/// パイプラインのステージ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classification,
    Quality,
    Analysis,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Classification => "classification",
            Stage::Quality => "quality",
            Stage::Analysis => "analysis",
        }
    }

    /// クライアントに返す失敗メッセージ
    pub fn failure_message(&self) -> &'static str {
        match self {
            Stage::Classification => "Image validation failed",
            Stage::Quality => "Image quality analysis failed",
            Stage::Analysis => "Image analysis failed",
        }
    }
}
