// SPDX-License-Identifier: Apache-2.0

//! `POST /download`: turn a client-held result set into a CSV attachment.

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::{info, instrument, warn};

use super::error::ApiError;
use crate::export::{CsvExporter, ExportRequest};

#[instrument(skip(payload))]
pub async fn download_csv(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable export request: {}", rejection.body_text());
        ApiError::internal(rejection.body_text())
    })?;

    let export = CsvExporter::export(&request.columns, &request.data)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(
        rows = request.data.len(),
        bytes = export.bytes.len(),
        filename = %export.filename,
        "CSV export prepared"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        )
        .body(Body::from(export.bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}
