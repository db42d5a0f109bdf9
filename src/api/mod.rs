// SPDX-License-Identifier: Apache-2.0

//! HTTP API for the query page
//!
//! ## Endpoints
//!
//! - `GET  /`         - Query page
//! - `POST /execute`  - Execute a SELECT statement
//! - `POST /download` - Export a result set as CSV
//! - `GET  /tables`   - List tables with columns and row counts

pub mod error;
pub mod export;
pub mod page;
pub mod query;
pub mod schema;

use axum::{
    routing::{get, post},
    Router,
};

use crate::SharedState;

pub use error::{ApiError, ErrorResponse};

/// Build the axum router for the gateway.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/execute", post(query::execute_query))
        .route("/download", post(export::download_csv))
        .route("/tables", get(schema::list_tables))
        .with_state(state)
}
