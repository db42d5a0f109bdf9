// SPDX-License-Identifier: Apache-2.0

//! `POST /execute`: run an ad-hoc SELECT.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{field, instrument, warn};

use sqldesk_core::Value;

use super::error::ApiError;
use crate::interceptor::AuditRecord;
use crate::SharedState;

/// Request body for `POST /execute`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub sql: String,
}

/// Successful query response.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
    pub count: usize,
}

#[instrument(skip(state, payload), fields(sql_len = field::Empty))]
pub async fn execute_query(
    State(state): State<SharedState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            // The attempt still counts; there is just no statement to record.
            let message = rejection.body_text();
            warn!("Unreadable query request: {}", message);
            state
                .executor
                .audit()
                .log(AuditRecord::failure("", message.as_str()));
            return Err(ApiError::internal(message));
        }
    };

    tracing::Span::current().record("sql_len", request.sql.len());

    let result = state.executor.execute(&request.sql).await?;

    Ok(Json(QueryResponse {
        count: result.row_count,
        columns: result.columns,
        data: result.rows,
    }))
}
