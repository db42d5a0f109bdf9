// SPDX-License-Identifier: Apache-2.0

//! Normalized error types for the query gateway
//!
//! Driver errors are mapped to these variants so the HTTP layer can pick a
//! status code without knowing which engine produced them. Messages coming
//! from the engine are carried verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all gateway operations
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    ExecutionError { message: String },

    #[error("{message}")]
    InspectionError { message: String },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError { message: msg.into() }
    }

    pub fn execution_error(msg: impl Into<String>) -> Self {
        Self::ExecutionError { message: msg.into() }
    }

    pub fn inspection_error(msg: impl Into<String>) -> Self {
        Self::InspectionError { message: msg.into() }
    }

    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: msg.into() }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal { message: msg.into() }
    }

    /// True for errors caused by the request itself rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationError { .. } | Self::ExecutionError { .. }
        )
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_messages_are_not_decorated() {
        let err = EngineError::execution_error("no such table: nope");
        assert_eq!(err.to_string(), "no such table: nope");

        let err = EngineError::validation("only SELECT allowed");
        assert_eq!(err.to_string(), "only SELECT allowed");
    }

    #[test]
    fn client_errors_are_validation_and_execution() {
        assert!(EngineError::validation("x").is_client_error());
        assert!(EngineError::execution_error("x").is_client_error());
        assert!(!EngineError::inspection_error("x").is_client_error());
        assert!(!EngineError::connection_failed("x").is_client_error());
        assert!(!EngineError::internal("x").is_client_error());
    }
}
