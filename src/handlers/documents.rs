use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::models::{SaveDocumentRequest, SaveDocumentResponse};

/// `POST /api/data`: validate and append one finalized result.
pub async fn save_document_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveDocumentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SaveDocumentResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected document payload");
        match rejection {
            JsonRejection::BytesRejection(ref inner) if inner.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::payload_too_large(inner.body_text())
            }
            _ => AppError::missing_fields(),
        }
    })?;

    let new_doc = request.validate()?;
    let document_type = new_doc.document_type.clone();

    let stored = state.store.insert(new_doc).await?;

    info!(
        id = %stored.id,
        document_type = %document_type,
        backend = state.store.backend(),
        "Document saved"
    );

    Ok((StatusCode::CREATED, Json(SaveDocumentResponse::new(stored))))
}
