//! Car View Common Library
//!
//! リレーサーバーとクライアントで共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod verdict;
pub mod data_url;
pub mod upload;

pub use types::{
    ErrorBody, QualityReport, RelayRequest, ValidationResult, VehicleAnalysis, ViewType,
};
pub use error::ParseError;
pub use parser::{parse_analysis_reply, parse_quality_reply, parse_view_reply, strip_code_fences};
pub use verdict::Verdict;
pub use data_url::{
    encode_data_url, extract_mime_type_from_data_url, is_image_mime, mime_for_extension,
};
pub use upload::{SlotStatus, UploadBoard, UploadRecord, UploadSlot, UploadStats, UploadTicket};
