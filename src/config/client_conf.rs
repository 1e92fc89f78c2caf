use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, WhatsAppConfig};

/// Settings for the submitting side of the quote flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Logging endpoint the form posts to
    pub endpoint: String,
    /// File holding the local ticket counter
    pub counter_path: PathBuf,
    pub whatsapp: WhatsAppConfig,
}

impl ClientConfig {
    /// Load client configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QUOTE_ENDPOINT: logging endpoint URL (defaults to http://127.0.0.1:8080/api/quote)
    /// - TICKET_COUNTER_PATH: counter file (defaults to data/ticket_counter)
    /// - WHATSAPP_NUMBER / WHATSAPP_BASE_URL: see `WhatsAppConfig`
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading quote client configuration from environment variables");

        let endpoint = env::var("QUOTE_ENDPOINT").unwrap_or_else(|_| {
            warn!("QUOTE_ENDPOINT not set, using local default");
            "http://127.0.0.1:8080/api/quote".to_string()
        });
        debug!("Quote endpoint: {}", endpoint);

        let counter_path = env::var("TICKET_COUNTER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                warn!("TICKET_COUNTER_PATH not set, using data/ticket_counter");
                PathBuf::from("data/ticket_counter")
            });
        debug!("Ticket counter path: {:?}", counter_path);

        let whatsapp = WhatsAppConfig::from_env()?;

        let config = ClientConfig { endpoint, counter_path, whatsapp };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!(
                "Quote endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        self.whatsapp.validate()
    }
}
