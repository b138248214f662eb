mod exif;

use crate::error::{Result, ValidatorError};
use car_view_common::mime_for_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 拡張子から判定できない場合のMIMEタイプ
const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub date: Option<String>,
}

/// 1ファイルの情報を取得（画像かどうかは問わない）
pub fn inspect_file(path: &Path) -> Result<ImageInfo> {
    if !path.is_file() {
        return Err(ValidatorError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mime_type = path
        .extension()
        .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
        .unwrap_or(FALLBACK_MIME)
        .to_string();

    let date = exif::extract_date(path).ok();

    Ok(ImageInfo {
        path: path.to_path_buf(),
        file_name,
        mime_type,
        date,
    })
}

/// フォルダ直下の画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(ValidatorError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_path(path) {
            continue;
        }

        images.push(inspect_file(path)?);
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
        .is_some()
}
