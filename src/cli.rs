use crate::batch::ValidationTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "car-view")]
#[command(about = "車両写真のアングル判定・品質評価リレー", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// リレーエンドポイントを起動
    Serve {
        /// 待ち受けアドレス（デフォルト: 設定ファイルの bind_address）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// 画像のアングルを判定
    Validate {
        /// 判定対象（VIEW=PATH、例: front=photos/front.jpg）
        targets: Vec<ValidationTarget>,

        /// フォルダ内の全画像を対象にする（--view と併用）
        #[arg(short, long, requires = "view")]
        folder: Option<PathBuf>,

        /// フォルダ指定時の期待アングル (front/back/side/left_side/right_side/top)
        #[arg(long, requires = "folder")]
        view: Option<String>,

        /// リレーエンドポイントのURL（省略時はプロセス内で判定）
        #[arg(long)]
        relay: Option<String>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
