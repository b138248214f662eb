//! car-view: 車両写真アングル判定リレー
//!
//! - `validator`: 分類→品質→属性の3段階パイプライン
//! - `gateway`: チャット補完APIとの境界
//! - `server`: リレーエンドポイント（axum）
//! - `batch` / `relay_client`: 複数画像の一括判定クライアント

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod relay_client;
pub mod scanner;
pub mod server;
pub mod validator;
