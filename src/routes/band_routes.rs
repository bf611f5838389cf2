//! Band resource endpoint handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::bands::{CreateBandError, FieldError};
use crate::models::{Band, CreateBand};
use crate::state::AppState;
use crate::store::StoreError;

/// Registers band resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bands", get(list_bands).post(create_band))
        .route("/bands/:id", delete(delete_band))
}

#[derive(Serialize)]
struct DeleteBandResponse {
    deleted_count: u64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

/// Maps store errors to appropriate HTTP responses.
fn map_store_error(e: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!("Store error: {}", e);
    let status = match e {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorResponse {
        error: e.to_string(),
        fields: Vec::new(),
    };
    (status, Json(body))
}

/// Lists all band records.
async fn list_bands(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Band>>), (StatusCode, Json<ErrorResponse>)> {
    let bands = state.bands.list().await.map_err(map_store_error)?;
    Ok((StatusCode::OK, Json(bands)))
}

/// Creates a band record from a validated payload.
async fn create_band(
    State(state): State<AppState>,
    Json(payload): Json<CreateBand>,
) -> Result<(StatusCode, Json<Band>), (StatusCode, Json<ErrorResponse>)> {
    let band = state.bands.create(payload).await.map_err(|e| match e {
        CreateBandError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                fields: validation.fields,
            }),
        ),
        CreateBandError::Store(store) => map_store_error(store),
    })?;

    Ok((StatusCode::CREATED, Json(band)))
}

/// Deletes a band by id, reporting how many records were removed.
async fn delete_band(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteBandResponse>), (StatusCode, Json<ErrorResponse>)> {
    let deleted_count = state.bands.delete(&id).await.map_err(map_store_error)?;
    Ok((StatusCode::OK, Json(DeleteBandResponse { deleted_count })))
}
