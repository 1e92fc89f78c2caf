use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{ClientConfig, WhatsAppConfig};
use crate::dto::quote_dto::{QuoteAck, QuoteSubmission};
use crate::model::quote::QuoteField;
use crate::service::quote_form::{whatsapp_link, QuoteForm};
use crate::service::ticket_counter::{CounterError, FileTicketCounter, TicketCounter};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<QuoteField>),

    #[error(transparent)]
    Counter(#[from] CounterError),
}

/// Result of the logging call. Either way the deep link is still handed out.
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    Acknowledged { ticket_id: Option<String> },
    Failed { reason: String },
}

impl LogOutcome {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, LogOutcome::Acknowledged { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub ticket_number: u64,
    pub smart_id: String,
    pub message: String,
    pub deep_link: String,
    pub logging: LogOutcome,
}

/// Submitting side of the quote form: numbers the request, posts it to the
/// logging endpoint and produces the messaging deep link.
pub struct QuoteClient {
    http: reqwest::Client,
    endpoint: String,
    whatsapp: WhatsAppConfig,
    counter: Arc<dyn TicketCounter>,
}

impl QuoteClient {
    pub fn new(endpoint: impl Into<String>, whatsapp: WhatsAppConfig, counter: Arc<dyn TicketCounter>) -> Self {
        QuoteClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            whatsapp,
            counter,
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let counter = Arc::new(FileTicketCounter::new(config.counter_path));
        Self::new(config.endpoint, config.whatsapp, counter)
    }

    /// Submits and resets the form. The ticket counter advances once per
    /// submit, including when the logging call fails.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: &mut QuoteForm) -> Result<SubmitOutcome, ClientError> {
        let missing = form.missing_required();
        if !missing.is_empty() {
            return Err(ClientError::MissingFields(missing));
        }

        let ticket_number = self.counter.next().await?;
        let smart_id = form.smart_id();
        let message = form.message(ticket_number);
        let deep_link = whatsapp_link(&self.whatsapp.base_url, &self.whatsapp.number, &message);

        let submission = QuoteSubmission {
            quote: form.request().clone(),
            ticket_number,
            smart_id: smart_id.clone(),
        };
        let logging = self.post(&submission).await;
        match &logging {
            LogOutcome::Acknowledged { ticket_id } => {
                info!(ticket_number, ticket_id = ?ticket_id, "Quote logged")
            }
            LogOutcome::Failed { reason } => {
                warn!(ticket_number, "Quote logging failed, deep link still issued: {}", reason)
            }
        }

        form.reset();
        Ok(SubmitOutcome {
            ticket_number,
            smart_id,
            message,
            deep_link,
            logging,
        })
    }

    async fn post(&self, submission: &QuoteSubmission) -> LogOutcome {
        let response = match self.http.post(&self.endpoint).json(submission).send().await {
            Ok(r) => r,
            Err(e) => return LogOutcome::Failed { reason: e.to_string() },
        };

        let status = response.status();
        match response.json::<QuoteAck>().await {
            Ok(ack) if status.is_success() && ack.success => LogOutcome::Acknowledged { ticket_id: ack.ticket_id },
            Ok(ack) => LogOutcome::Failed {
                reason: format!("{}: {}", status, ack.message),
            },
            Err(e) => LogOutcome::Failed {
                reason: format!("{}: unreadable response: {}", status, e),
            },
        }
    }
}
