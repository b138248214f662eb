use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("AI_GATEWAY_API_KEY is not configured")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("不正なアングル指定: {0}")]
    InvalidView(String),

    /// 補完サービスが失敗ステータスを返した（ステージ別メッセージ）
    #[error("{stage}")]
    StageFailed { stage: &'static str, status: u16 },

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("リレー呼び出しエラー ({status}): {message}")]
    Relay { status: u16, message: String },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
