// SPDX-License-Identifier: Apache-2.0

//! Statement gate applied before anything reaches the engine.
//!
//! This is a prefix check on the leading keyword only. The rest of the
//! statement is not parsed, so `SELECT 1; DROP TABLE users` passes whenever
//! the driver accepts multi-statement batches.

use sqldesk_core::{EngineError, EngineResult};

pub const EMPTY_STATEMENT: &str = "empty statement";
pub const ONLY_SELECT_ALLOWED: &str = "only SELECT allowed";

/// True when the trimmed, upper-cased text starts with `SELECT`.
pub fn is_select_prefix(query: &str) -> bool {
    query.trim().to_uppercase().starts_with("SELECT")
}

/// Validates raw SQL and returns the trimmed statement to execute.
pub fn validate(query: &str) -> EngineResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(EMPTY_STATEMENT));
    }
    if !is_select_prefix(trimmed) {
        return Err(EngineError::validation(ONLY_SELECT_ALLOWED));
    }
    Ok(trimmed)
}
