// imgpress/src/server/handlers.rs
use crate::core::{ImageRecord, Result, ServiceError};
use crate::server::models::UploadRequest;
use crate::server::AppState;
use axum::extract::{Multipart, State};
use axum::Json;

/// `POST /upload`: accept a multipart batch, process it sequentially on a
/// blocking worker, and return one record per file in input order.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ImageRecord>>> {
    let request = UploadRequest::from_multipart(&mut multipart).await?;
    log::debug!(
        "upload: {} files, {}x{}, mode {:?}, optimize {}",
        request.files.len(),
        request.options.width,
        request.options.height,
        request.options.mode,
        request.options.optimize
    );

    let processor = state.processor.clone();
    let records = tokio::task::spawn_blocking(move || {
        processor.process_batch(&request.files, &request.options)
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("processing task failed: {e}")))??;

    Ok(Json(records))
}
