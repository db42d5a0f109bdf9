//! Interceptor Types
//!
//! Records written by the audit logger.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Outcome of a single execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

/// One line of the audit log. Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Local wall-clock time, second precision
    #[serde(with = "audit_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Statement text as submitted, minus surrounding whitespace
    pub sql: String,
    pub status: AuditStatus,
    /// Error message if failed; serialized as `null` otherwise
    pub error: Option<String>,
}

impl AuditRecord {
    pub fn new(sql: impl Into<String>, status: AuditStatus, error: Option<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            sql: sql.into(),
            status,
            error,
        }
    }

    pub fn success(sql: impl Into<String>) -> Self {
        Self::new(sql, AuditStatus::Success, None)
    }

    pub fn failure(sql: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(sql, AuditStatus::Error, Some(error.into()))
    }
}

mod audit_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
