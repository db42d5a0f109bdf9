// SPDX-License-Identifier: Apache-2.0

//! `GET /tables`: schema snapshot of every table.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use sqldesk_core::TableInfo;

use super::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct TablesResponse {
    pub tables: Vec<TableInfo>,
}

#[instrument(skip(state))]
pub async fn list_tables(
    State(state): State<SharedState>,
) -> Result<Json<TablesResponse>, ApiError> {
    // Inspection failures are 500 here, unlike query failures on /execute.
    let tables = state
        .engine
        .list_tables()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    debug!(tables = tables.len(), "Listed tables");
    Ok(Json(TablesResponse { tables }))
}
