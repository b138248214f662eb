//! 複数画像の一括判定
//!
//! 1画像ごとに枠を割り当て、すべての判定を同時に投げる。
//! 完了順は不定なので結果は枠番号で書き戻す。並列数の上限は設けない。

use crate::error::Result;
use crate::scanner::{self, ImageInfo};
use crate::validator::ViewClassifier;
use car_view_common::{SlotStatus, UploadBoard, UploadStats, ValidationResult, ViewType};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};

/// 判定対象（"front=photos/front.jpg" 形式）
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationTarget {
    pub view: ViewType,
    pub path: PathBuf,
}

impl FromStr for ValidationTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (view, path) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected VIEW=PATH, got: {}", s))?;
        let view = view
            .parse::<ViewType>()
            .map_err(|e| format!("Unknown view '{}': {}", view, e))?;
        if path.trim().is_empty() {
            return Err(format!("Missing path for view '{}'", view));
        }

        Ok(Self {
            view,
            path: PathBuf::from(path.trim()),
        })
    }
}

/// 1枠分の結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotReport {
    pub view: ViewType,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub total: usize,
    pub uploaded: usize,
    pub validated: usize,
    pub match_rate: f64,
}

impl From<UploadStats> for BatchStats {
    fn from(s: UploadStats) -> Self {
        Self {
            total: s.total,
            uploaded: s.uploaded,
            validated: s.validated,
            match_rate: s.match_rate,
        }
    }
}

/// 一括判定の結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub slots: Vec<SlotReport>,
    pub stats: BatchStats,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.slots.iter().filter(|s| s.error.is_some()).count()
    }
}

/// フォルダ内の全画像を同じアングルとして対象にする
pub fn targets_from_folder(
    folder: &std::path::Path,
    view: ViewType,
) -> Result<Vec<ValidationTarget>> {
    Ok(scanner::scan_folder(folder)?
        .into_iter()
        .map(|img| ValidationTarget { view, path: img.path })
        .collect())
}

/// すべての対象を同時に判定する
///
/// 失敗した枠は判定中のまま残し、エラー内容をレポートに載せる
pub async fn validate_targets(
    targets: &[ValidationTarget],
    classifier: Arc<dyn ViewClassifier>,
    show_progress: bool,
) -> Result<BatchReport> {
    let infos: Vec<ImageInfo> = targets
        .iter()
        .map(|t| scanner::inspect_file(&t.path))
        .collect::<Result<_>>()?;

    let views: Vec<ViewType> = targets.iter().map(|t| t.view).collect();
    let mut board = UploadBoard::new(&views);

    let mut tickets = Vec::new();
    for (index, info) in infos.iter().enumerate() {
        let bytes = tokio::fs::read(&info.path).await?;
        match board.accept(index, &info.file_name, &info.mime_type, &bytes) {
            Some(ticket) => tickets.push(ticket),
            None => debug!(file = %info.file_name, mime = %info.mime_type, "not an image, skipped"),
        }
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(tickets.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    let mut pending: FuturesUnordered<_> = tickets
        .into_iter()
        .map(|ticket| {
            let classifier = Arc::clone(&classifier);
            async move {
                let outcome = classifier
                    .classify_view(&ticket.image_data_url, ticket.expected_view)
                    .await;
                (ticket, outcome)
            }
        })
        .collect();

    let mut errors: Vec<Option<String>> = vec![None; infos.len()];
    while let Some((ticket, outcome)) = pending.next().await {
        match outcome {
            Ok(result) => {
                board.complete(&ticket, result);
            }
            Err(e) => {
                error!(file = %infos[ticket.index].file_name, error = %e, "validation failed");
                errors[ticket.index] = Some(e.to_string());
            }
        }
        if let Some(pb) = &progress {
            pb.set_message(infos[ticket.index].file_name.clone());
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let slots = board
        .slots()
        .iter()
        .zip(infos)
        .zip(errors)
        .map(|((slot, info), error)| SlotReport {
            view: slot.view,
            file_name: info.file_name,
            date: info.date,
            status: status_label(slot.status()),
            result: slot.validation().cloned(),
            error,
        })
        .collect();

    Ok(BatchReport {
        slots,
        stats: board.stats().into(),
    })
}

fn status_label(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Empty => "skipped",
        SlotStatus::Validating => "validating",
        SlotStatus::Validated => "validated",
    }
}
