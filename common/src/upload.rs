//! アップロード枠の状態管理
//!
//! アングルごとに1枠。ファイルを受け付けるとプレビュー（Data URL）を作り、
//! 判定結果が返るまで `Validating` のまま保持する。
//! 判定は枠番号で書き戻すため、複数枚を同時に投げても完了順は問わない。

use crate::data_url::{encode_data_url, is_image_mime};
use crate::types::{ValidationResult, ViewType};

/// アップロード済みファイル
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub file_name: String,
    pub mime_type: String,
    /// "data:image/...;base64,..." 形式
    pub preview: String,
    pub validation: Option<ValidationResult>,
}

/// 枠の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Empty,
    Validating,
    Validated,
}

#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub view: ViewType,
    record: Option<UploadRecord>,
    generation: u64,
}

impl UploadSlot {
    fn new(view: ViewType) -> Self {
        Self {
            view,
            record: None,
            generation: 0,
        }
    }

    pub fn record(&self) -> Option<&UploadRecord> {
        self.record.as_ref()
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.record.as_ref().and_then(|r| r.validation.as_ref())
    }

    pub fn status(&self) -> SlotStatus {
        match &self.record {
            None => SlotStatus::Empty,
            Some(r) if r.validation.is_none() => SlotStatus::Validating,
            Some(_) => SlotStatus::Validated,
        }
    }
}

/// 判定依頼の引換券
///
/// 枠の差し替え後に古い結果が書き込まれないよう世代番号を持つ
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub index: usize,
    pub generation: u64,
    pub expected_view: ViewType,
    pub image_data_url: String,
}

/// 集計値（表示はしない）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadStats {
    pub total: usize,
    pub uploaded: usize,
    pub validated: usize,
    /// 一致数 / アップロード数（アップロード0件なら0.0）
    pub match_rate: f64,
}

/// アップロード枠の集合
#[derive(Debug, Clone, Default)]
pub struct UploadBoard {
    slots: Vec<UploadSlot>,
}

impl UploadBoard {
    /// 標準の5枠（前・後・左・右・上）
    pub const STANDARD_VIEWS: &'static [ViewType] = &[
        ViewType::Front,
        ViewType::Back,
        ViewType::LeftSide,
        ViewType::RightSide,
        ViewType::Top,
    ];

    pub fn new(views: &[ViewType]) -> Self {
        Self {
            slots: views.iter().copied().map(UploadSlot::new).collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new(Self::STANDARD_VIEWS)
    }

    pub fn slots(&self) -> &[UploadSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&UploadSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// ファイルを受け付ける
    ///
    /// 画像以外のMIMEタイプや範囲外の枠は何も言わずに無視する（None）。
    /// 受け付けた場合は以前の結果を破棄し、判定依頼用の引換券を返す。
    pub fn accept(
        &mut self,
        index: usize,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Option<UploadTicket> {
        if !is_image_mime(mime_type) {
            return None;
        }
        let slot = self.slots.get_mut(index)?;

        let preview = encode_data_url(mime_type, bytes);
        slot.generation += 1;
        slot.record = Some(UploadRecord {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            preview: preview.clone(),
            validation: None,
        });

        Some(UploadTicket {
            index,
            generation: slot.generation,
            expected_view: slot.view,
            image_data_url: preview,
        })
    }

    /// 判定結果を枠に書き戻す
    ///
    /// 引換券の世代が古い（その後ファイルが差し替えられた）場合はfalse
    pub fn complete(&mut self, ticket: &UploadTicket, result: ValidationResult) -> bool {
        let Some(slot) = self.slots.get_mut(ticket.index) else {
            return false;
        };
        if slot.generation != ticket.generation {
            return false;
        }
        match slot.record.as_mut() {
            Some(record) => {
                record.validation = Some(result);
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> UploadStats {
        let uploaded = self.slots.iter().filter(|s| s.record.is_some()).count();
        let validated = self
            .slots
            .iter()
            .filter(|s| s.validation().is_some_and(|v| v.is_match))
            .count();
        let match_rate = if uploaded == 0 {
            0.0
        } else {
            validated as f64 / uploaded as f64
        };

        UploadStats {
            total: self.slots.len(),
            uploaded,
            validated,
            match_rate,
        }
    }
}
