use serde::{Deserialize, Serialize};
use thiserror::Error;

use sqldesk_core::Value;

/// Body of `POST /download`: a result set the client already holds.
///
/// Rows are taken as given; nothing checks them against `columns`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// A finished CSV download
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    /// UTF-8 with a leading byte-order mark
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}
