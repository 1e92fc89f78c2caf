use axum::{body::Bytes, extract::{rejection::BytesRejection, State}, response::IntoResponse, Json};
use crate::dto::quote_dto::{QuoteAck, QuotePreviewRequest};
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use std::sync::Arc;
use tracing::{error, info};

/// Logging endpoint: any JSON body is acknowledged, anything else is a 500
/// envelope, including bodies the extractor refuses to buffer.
pub async fn log_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    body: Result<Bytes, BytesRejection>,
) -> QuoteAck {
    let body = match body {
        Ok(b) => b,
        Err(e) => {
            error!("[log_quote_handler] Failed to read body: {}", e);
            return QuoteAck::failed("Error al procesar la solicitud");
        }
    };
    info!("[log_quote_handler] Handler called ({} bytes)", body.len());
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            error!("[log_quote_handler] Invalid JSON: {}", e);
            return QuoteAck::failed("Error al procesar la solicitud");
        }
    };
    service.log_quote(payload).await
}

pub async fn preview_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = body.map_err(|e| {
        error!("[preview_quote_handler] Failed to read body: {}", e);
        HandlerError::new(HandlerErrorKind::BadRequest, "Failed to read request body").with_details(e.body_text())
    })?;
    let request: QuotePreviewRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("[preview_quote_handler] Invalid JSON: {}", e);
        HandlerError::new(HandlerErrorKind::BadRequest, "Invalid JSON").with_details(e.to_string())
    })?;
    let preview = service.preview(request).await?;
    Ok(Json(preview))
}
