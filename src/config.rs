use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const API_KEY_ENV: &str = "AI_GATEWAY_API_KEY";
pub const GATEWAY_URL_ENV: &str = "AI_GATEWAY_URL";
pub const BIND_ENV: &str = "CAR_VIEW_BIND";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub model: String,
    pub bind_address: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway_url: "https://ai.gateway.lovable.dev".into(),
            model: "google/gemini-2.5-flash".into(),
            bind_address: "0.0.0.0:8787".into(),
            timeout_seconds: 120,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書きする
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 壊れた設定ファイルは無視して既定値で読み込む（`config` コマンドでの修復用）
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_from_or_default(&Self::config_path()?))
    }

    fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            Self::default().with_env_overrides()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            ValidatorError::Config("ホームディレクトリが見つかりません".into())
        })?;
        Ok(home.join(".config").join("car-view").join("config.json"))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env(GATEWAY_URL_ENV) {
            self.gateway_url = url;
        }
        if let Some(bind) = non_empty_env(BIND_ENV) {
            self.bind_address = bind;
        }
        self
    }

    /// APIキー（環境変数を優先）
    pub fn api_key(&self) -> Option<String> {
        non_empty_env(API_KEY_ENV).or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
