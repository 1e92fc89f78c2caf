use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Target of the quote deep link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Studio number in international format; separators are allowed
    pub number: String,
    /// Deep link base, without the number
    pub base_url: String,
}

impl WhatsAppConfig {
    /// Load WhatsApp configuration from environment variables
    ///
    /// Expected environment variables:
    /// - WHATSAPP_NUMBER: studio number, e.g. "+51 999 888 777" (required)
    /// - WHATSAPP_BASE_URL: deep link base (defaults to https://wa.me)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading WhatsApp configuration from environment variables");

        let number = env::var("WHATSAPP_NUMBER").map_err(|_| {
            error!("WHATSAPP_NUMBER environment variable not found");
            ConfigError::EnvVarNotFound("WHATSAPP_NUMBER".to_string())
        })?;
        debug!("WhatsApp number: {}", number);

        let base_url = env::var("WHATSAPP_BASE_URL").unwrap_or_else(|_| {
            warn!("WHATSAPP_BASE_URL not set, defaulting to {}", DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });

        let config = WhatsAppConfig { number, base_url };
        config.validate()?;
        Ok(config)
    }

    pub fn new(number: impl Into<String>) -> Self {
        WhatsAppConfig {
            number: number.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let digits = self.number.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < 6 {
            error!("WhatsApp number has too few digits");
            return Err(ConfigError::ValidationError(format!(
                "WhatsApp number must contain at least 6 digits, got {}",
                digits
            )));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!(
                "WhatsApp base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_base() {
        let config = WhatsAppConfig::new("+51 999 888 777");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_short_number() {
        let config = WhatsAppConfig::new("12-34");
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = WhatsAppConfig::new("51999888777");
        config.base_url = "wa.me".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
