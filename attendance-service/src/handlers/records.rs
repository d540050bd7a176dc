//! The attendance record endpoint.
//!
//! GET lists every stored record without its internal `_id`; POST stores the
//! body as-is. Bodies that are not JSON objects are turned away by the `Json`
//! extractor before reaching the store.

use crate::dtos::MessageResponse;
use crate::models::Record;
use crate::services::metrics::{record_inserted, record_listed};
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    let records = state.store.list_records().await?;

    tracing::info!(
        count = records.len(),
        store = state.store.backend(),
        "Listed attendance records"
    );
    record_listed(state.store.backend(), records.len());

    Ok(Json(records))
}

pub async fn create_record(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<Json<MessageResponse>, AppError> {
    tracing::info!(
        fields = record.len(),
        store = state.store.backend(),
        "Adding attendance record"
    );

    state.store.insert_record(record).await?;
    record_inserted(state.store.backend());

    Ok(Json(MessageResponse::record_added()))
}
