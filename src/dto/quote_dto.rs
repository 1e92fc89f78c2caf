use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};

use crate::model::quote::{QuoteField, QuoteRequest};

/// Envelope returned by the logging endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAck {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

impl QuoteAck {
    pub fn received(ticket_id: String) -> Self {
        QuoteAck {
            success: true,
            message: "Solicitud de cotización recibida".to_string(),
            ticket_id: Some(ticket_id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        QuoteAck {
            success: false,
            message: message.into(),
            ticket_id: None,
        }
    }
}

impl IntoResponse for QuoteAck {
    fn into_response(self) -> Response {
        let status = if self.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self)).into_response()
    }
}

/// Body the quote form posts to the logging endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSubmission {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    pub ticket_number: u64,
    pub smart_id: String,
}

/// Form state to render; `ticketNumber` is only used for the header line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePreviewRequest {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    #[serde(default)]
    pub ticket_number: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePreviewResponse {
    pub can_submit: bool,
    pub missing: Vec<QuoteField>,
    pub smart_id: String,
    pub lines: Vec<String>,
    pub message: String,
    pub whatsapp_url: String,
}
