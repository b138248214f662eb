//! 一括判定のテスト
//!
//! 判定器を差し替え、枠への書き戻しと集計を検証

use car_view::batch::{targets_from_folder, validate_targets, ValidationTarget};
use car_view::error::{Result, ValidatorError};
use car_view::validator::ViewClassifier;
use car_view_common::{ValidationResult, Verdict, ViewType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// 画像データの中身（"front" 等）をそのまま検出結果にする判定器
///
/// "slow" を含む画像は遅らせ、"fail" を含む画像は失敗させる
#[derive(Default)]
struct EchoClassifier {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl ViewClassifier for EchoClassifier {
    async fn classify_view(&self, image: &str, expected: ViewType) -> Result<ValidationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let payload = image.split(',').nth(1).unwrap_or_default();
        let decoded = match payload {
            "ZnJvbnQ=" => "front",
            "YmFjaw==" => "back",
            "c2xvdyBmcm9udA==" => "slow front",
            "ZmFpbA==" => "fail",
            _ => "unknown",
        };

        if decoded.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if decoded == "fail" {
            return Err(ValidatorError::ApiCall("connection reset".into()));
        }

        let detected: ViewType = decoded
            .trim_start_matches("slow ")
            .parse()
            .unwrap_or(ViewType::Unknown);
        let verdict = Verdict::evaluate(detected, expected);
        Ok(ValidationResult {
            detected_view: detected,
            expected_view: expected,
            is_match: verdict.is_match,
            confidence: verdict.confidence,
            analysis: None,
            quality: None,
        })
    }
}

fn write(dir: &std::path::Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// 完了順が入れ替わっても枠番号どおりに結果が入る
#[tokio::test]
async fn test_results_written_by_index() {
    let dir = tempdir().unwrap();
    let targets = vec![
        ValidationTarget { view: ViewType::Front, path: write(dir.path(), "f.jpg", b"slow front") },
        ValidationTarget { view: ViewType::Front, path: write(dir.path(), "b.jpg", b"back") },
    ];

    let classifier = Arc::new(EchoClassifier::default());
    let report = validate_targets(&targets, classifier.clone(), false).await.unwrap();

    assert_eq!(report.slots.len(), 2);
    assert_eq!(report.slots[0].file_name, "f.jpg");
    assert_eq!(report.slots[0].result.as_ref().unwrap().detected_view, ViewType::Front);
    assert!(report.slots[0].result.as_ref().unwrap().is_match);
    assert_eq!(report.slots[1].result.as_ref().unwrap().detected_view, ViewType::Back);
    assert_eq!(report.slots[1].result.as_ref().unwrap().confidence, 0.85);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);

    assert_eq!(report.stats.uploaded, 2);
    assert_eq!(report.stats.validated, 1);
    assert!((report.stats.match_rate - 0.5).abs() < 1e-9);
}

/// 画像以外は何も言わずにスキップ（判定器は呼ばれない）
#[tokio::test]
async fn test_non_image_is_skipped() {
    let dir = tempdir().unwrap();
    let targets = vec![
        ValidationTarget { view: ViewType::Front, path: write(dir.path(), "front.jpg", b"front") },
        ValidationTarget { view: ViewType::Back, path: write(dir.path(), "notes.txt", b"back") },
    ];

    let classifier = Arc::new(EchoClassifier::default());
    let report = validate_targets(&targets, classifier.clone(), false).await.unwrap();

    assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.slots[1].status, "skipped");
    assert!(report.slots[1].error.is_none());
    assert_eq!(report.stats.uploaded, 1);
    assert_eq!(report.failures(), 0);
}

/// 失敗した枠は判定中のまま残り、エラーが記録される
#[tokio::test]
async fn test_failure_leaves_slot_validating() {
    let dir = tempdir().unwrap();
    let targets = vec![
        ValidationTarget { view: ViewType::Top, path: write(dir.path(), "top.png", b"fail") },
        ValidationTarget { view: ViewType::Back, path: write(dir.path(), "back.png", b"back") },
    ];

    let report = validate_targets(&targets, Arc::new(EchoClassifier::default()), false)
        .await
        .unwrap();

    assert_eq!(report.slots[0].status, "validating");
    assert!(report.slots[0].result.is_none());
    assert!(report.slots[0].error.as_ref().unwrap().contains("connection reset"));
    assert_eq!(report.slots[1].status, "validated");
    assert_eq!(report.failures(), 1);
}

/// 存在しないファイルは判定前にエラー
#[tokio::test]
async fn test_missing_file_is_error() {
    let targets = vec![ValidationTarget {
        view: ViewType::Front,
        path: "/nonexistent/front.jpg".into(),
    }];

    let result = validate_targets(&targets, Arc::new(EchoClassifier::default()), false).await;
    assert!(matches!(result, Err(ValidatorError::FileNotFound(_))));
}

/// フォルダ指定は画像だけを同じアングルで対象にする
#[test]
fn test_targets_from_folder() {
    let dir = tempdir().unwrap();
    write(dir.path(), "2.jpg", b"x");
    write(dir.path(), "1.png", b"x");
    write(dir.path(), "readme.md", b"x");

    let targets = targets_from_folder(dir.path(), ViewType::Side).unwrap();
    assert_eq!(targets.len(), 2);
    assert!(targets[0].path.ends_with("1.png"));
    assert!(targets.iter().all(|t| t.view == ViewType::Side));
}
