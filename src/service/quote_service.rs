use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::config::WhatsAppConfig;
use crate::dto::quote_dto::{QuoteAck, QuotePreviewRequest, QuotePreviewResponse};
use crate::model::quote::QuoteRequest;
use crate::service::quote_form::{format_ticket, whatsapp_link, QuoteForm};
use crate::util::email::SmtpEmailService;
use crate::util::error::ServiceError;

#[async_trait]
pub trait QuoteService: Send + Sync {
	/// Logs an already parsed payload and acknowledges it. Never fails.
	async fn log_quote(&self, payload: Value) -> QuoteAck;
	async fn preview(&self, request: QuotePreviewRequest) -> Result<QuotePreviewResponse, ServiceError>;
}

pub struct QuoteServiceImpl {
	pub whatsapp: WhatsAppConfig,
	pub notifier: Option<Arc<SmtpEmailService>>,
}

impl QuoteServiceImpl {
	pub fn new(whatsapp: WhatsAppConfig, notifier: Option<Arc<SmtpEmailService>>) -> Self {
		QuoteServiceImpl { whatsapp, notifier }
	}

	fn dispatch_notification(&self, ticket_id: &str, payload: &Value) {
		let Some(notifier) = self.notifier.clone() else {
			debug!("Email notifications disabled, skipping");
			return;
		};
		let ticket_id = ticket_id.to_string();
		let lines = notification_lines(payload);
		tokio::spawn(async move {
			if let Err(e) = notifier.send_quote_notification(&ticket_id, &lines).await {
				error!(ticket_id = %ticket_id, "Failed to send quote notification: {e}");
			}
		});
	}
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
	#[instrument(skip(self, payload))]
	async fn log_quote(&self, payload: Value) -> QuoteAck {
		let ticket_id = ticket_id_for(&payload, chrono::Local::now());
		info!(ticket_id = %ticket_id, payload = %payload, "Quote request received");
		self.dispatch_notification(&ticket_id, &payload);
		QuoteAck::received(ticket_id)
	}

	#[instrument(skip(self, request))]
	async fn preview(&self, request: QuotePreviewRequest) -> Result<QuotePreviewResponse, ServiceError> {
		request.quote.validate().map_err(|e| {
			warn!("Quote preview rejected: {e}");
			ServiceError::InvalidInput(format!("Validation error: {}", e))
		})?;

		let form = QuoteForm::from_request(request.quote);
		let message = form.message(request.ticket_number.unwrap_or(0));
		let whatsapp_url = whatsapp_link(&self.whatsapp.base_url, &self.whatsapp.number, &message);

		Ok(QuotePreviewResponse {
			can_submit: form.can_submit(),
			missing: form.missing_required(),
			smart_id: form.smart_id(),
			lines: form.summary_lines(),
			message,
			whatsapp_url,
		})
	}
}

/// `COT-<ticket>-<smartId>` from whatever the form sent, or a timestamp
/// reference when it sent neither.
pub fn ticket_id_for<Tz: chrono::TimeZone>(payload: &Value, now: chrono::DateTime<Tz>) -> String
where
	Tz::Offset: std::fmt::Display,
{
	let ticket = payload.get("ticketNumber").and_then(|v| match v {
		Value::Number(n) => n.as_u64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	});
	let smart_id = payload
		.get("smartId")
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|s| !s.is_empty());

	let mut parts = vec!["COT".to_string()];
	if let Some(ticket) = ticket {
		parts.push(format_ticket(ticket));
	}
	if let Some(smart_id) = smart_id {
		parts.push(smart_id.to_string());
	}
	if parts.len() == 1 {
		parts.push(now.format("%Y%m%d%H%M%S").to_string());
	}
	parts.join("-")
}

/// Summary lines for the studio inbox; payloads that are not quote-shaped are
/// forwarded as pretty JSON.
fn notification_lines(payload: &Value) -> Vec<String> {
	let lines = serde_json::from_value::<QuoteRequest>(payload.clone())
		.map(|q| QuoteForm::from_request(q).summary_lines())
		.unwrap_or_default();
	if !lines.is_empty() {
		return lines;
	}
	serde_json::to_string_pretty(payload)
		.map(|s| s.lines().map(str::to_string).collect())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use serde_json::json;

	fn fixed_now() -> chrono::DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap()
	}

	#[test]
	fn test_ticket_id_from_number_and_smart_id() {
		let payload = json!({ "ticketNumber": 42, "smartId": "AZO-40-MIR-ANA" });
		assert_eq!(ticket_id_for(&payload, fixed_now()), "COT-0042-AZO-40-MIR-ANA");
	}

	#[test]
	fn test_ticket_id_accepts_string_number() {
		let payload = json!({ "ticketNumber": "7" });
		assert_eq!(ticket_id_for(&payload, fixed_now()), "COT-0007");
	}

	#[test]
	fn test_ticket_id_falls_back_to_timestamp() {
		assert_eq!(ticket_id_for(&json!({ "name": "Ana" }), fixed_now()), "COT-20250309140507");
		assert_eq!(ticket_id_for(&json!([1, 2, 3]), fixed_now()), "COT-20250309140507");
	}

	#[test]
	fn test_notification_lines_for_quote_payload() {
		let payload = json!({ "projectType": "Terraza", "name": "Luis" });
		assert_eq!(
			notification_lines(&payload),
			vec!["Tipo de proyecto: Terraza".to_string(), "Nombre: Luis".to_string()]
		);
	}

	#[test]
	fn test_notification_lines_for_foreign_payload() {
		let lines = notification_lines(&json!({ "foo": "bar" }));
		assert!(lines.iter().any(|l| l.contains("\"foo\": \"bar\"")));
	}
}
