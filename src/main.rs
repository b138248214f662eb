use clap::Parser;
use car_view::{batch, cli, config, gateway, relay_client, server, validator};
use cli::{Cli, Commands};
use config::Config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use validator::ViewClassifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { bind } => {
            let config = Config::load()?;
            let bind_address = bind.unwrap_or_else(|| config.bind_address.clone());

            if config.api_key().is_none() {
                tracing::warn!(
                    "{} is not set; classify requests will fail until it is configured",
                    config::API_KEY_ENV
                );
            }

            let model = gateway::GatewayClient::new(&config)?;
            tracing::info!(
                endpoint = model.endpoint(),
                model = %config.model,
                "AI gateway configured"
            );

            let classifier = validator::GatewayValidator::new(Arc::new(model));
            server::serve(&bind_address, server::AppState::new(Arc::new(classifier))).await?;
        }

        Commands::Validate { targets, folder, view, relay, output } => {
            let config = Config::load()?;
            println!("🚗 car-view - アングル判定\n");

            // 1. 対象を集める
            println!("[1/3] 対象を確認中...");
            let mut targets = targets;
            if let (Some(folder), Some(view)) = (folder, view.as_deref()) {
                let view = validator::parse_view(view)?;
                targets.extend(batch::targets_from_folder(&folder, view)?);
            }
            if targets.is_empty() {
                anyhow::bail!(
                    "判定対象がありません（VIEW=PATH か --folder/--view を指定してください）"
                );
            }
            println!("✔ {}枚\n", targets.len());

            // 2. 判定
            let classifier: Arc<dyn ViewClassifier> = match relay {
                Some(url) => {
                    println!("[2/3] リレーで判定中... ({})", url);
                    Arc::new(relay_client::RelayClient::new(url, config.timeout_seconds)?)
                }
                None => {
                    println!("[2/3] AIゲートウェイで判定中...");
                    let model = gateway::GatewayClient::new(&config)?;
                    Arc::new(validator::GatewayValidator::new(Arc::new(model)))
                }
            };
            let report = batch::validate_targets(&targets, classifier, !cli.verbose).await?;
            println!("✔ 判定完了\n");

            // 3. 結果表示
            println!("[3/3] 結果");
            print_report(&report);

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&output, json)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }

            if report.failures() > 0 {
                anyhow::bail!("{}枚の判定に失敗しました", report.failures());
            }
        }

        Commands::Config { set_api_key, show } => {
            // 壊れた設定ファイルでも --set-api-key で上書きできるようにする
            let mut config = Config::load_or_default()?;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ゲートウェイ: {}", config.gateway_url);
                println!("  モデル: {}", config.model);
                println!("  待ち受け: {}", config.bind_address);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                let key_state = if config.api_key().is_some() {
                    "設定済み"
                } else {
                    "未設定"
                };
                println!("  APIキー: {}", key_state);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn print_report(report: &batch::BatchReport) {
    for slot in &report.slots {
        let view = slot.view.label();
        match (&slot.result, &slot.error) {
            (Some(result), _) if result.is_match => {
                println!(
                    "  ✅ {} ({}): 一致  信頼度 {:.0}%",
                    view,
                    slot.file_name,
                    result.confidence * 100.0
                );
            }
            (Some(result), _) => {
                println!(
                    "  ❌ {} ({}): 不一致 → {} を検出  信頼度 {:.0}%",
                    view,
                    slot.file_name,
                    result.detected_view.label(),
                    result.confidence * 100.0
                );
            }
            (None, Some(err)) => {
                println!("  ⚠ {} ({}): 判定失敗 {}", view, slot.file_name, err)
            }
            (None, None) => println!("  - {} ({}): {}", view, slot.file_name, slot.status),
        }

        if let Some(quality) = slot.result.as_ref().and_then(|r| r.quality.as_ref()) {
            println!(
                "      品質 {}/100 ({}{})  {}",
                quality.quality_score,
                quality.sharpness,
                if quality.is_blurry { ", ブレあり" } else { "" },
                quality.issues
            );
        }
        if let Some(analysis) = slot.result.as_ref().and_then(|r| r.analysis.as_ref()) {
            println!(
                "      {} {} / {} / 状態: {} / 損傷: {}",
                analysis.make, analysis.model, analysis.color, analysis.condition, analysis.damage
            );
        }
    }

    let stats = &report.stats;
    println!(
        "\n  アップロード {}/{}  一致 {}/{}  一致率 {:.0}%",
        stats.uploaded,
        stats.total,
        stats.validated,
        stats.total,
        stats.match_rate * 100.0
    );
}
