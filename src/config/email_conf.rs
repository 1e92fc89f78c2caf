use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// SMTP settings for quote notifications sent to the studio inbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP username, empty for unauthenticated relays
    pub smtp_username: String,
    /// SMTP password, empty for unauthenticated relays
    pub smtp_password: String,
    /// Whether to use TLS encryption
    pub use_tls: bool,
    /// Whether to use STARTTLS
    pub use_starttls: bool,
    /// From email address
    pub from_email: String,
    /// From name (display name)
    pub from_name: String,
    /// Inbox that receives a copy of every logged quote
    pub notify_to: String,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl EmailConfig {
    /// Notifications are optional: `Ok(None)` when SMTP_HOST is not set.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        if env::var("SMTP_HOST").is_err() {
            info!("SMTP_HOST not set, quote email notifications disabled");
            return Ok(None);
        }
        Self::from_env().map(Some)
    }

    /// Create EmailConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading email configuration from environment variables");

        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| {
                error!("SMTP_HOST environment variable not found");
                ConfigError::EnvVarNotFound("SMTP_HOST".to_string())
            })?;
        debug!("SMTP host: {}", smtp_host);

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| {
                warn!("SMTP_PORT not set, defaulting to 587");
                "587".to_string()
            })
            .parse::<u16>()
            .map_err(|_| {
                error!("Invalid SMTP_PORT value");
                ConfigError::InvalidValue("Invalid SMTP_PORT value".to_string())
            })?;
        debug!("SMTP port: {}", smtp_port);

        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        if smtp_username.is_empty() {
            debug!("No SMTP credentials provided");
        } else {
            debug!("SMTP username: {}, password: [REDACTED]", smtp_username);
        }

        let use_tls = env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| {
                warn!("SMTP_USE_TLS not set, defaulting to true");
                "true".to_string()
            })
            .parse::<bool>()
            .unwrap_or(true);

        let use_starttls = env::var("SMTP_USE_STARTTLS")
            .unwrap_or_else(|_| {
                warn!("SMTP_USE_STARTTLS not set, defaulting to true");
                "true".to_string()
            })
            .parse::<bool>()
            .unwrap_or(true);
        debug!("SMTP TLS: {}, STARTTLS: {}", use_tls, use_starttls);

        let from_email = env::var("SMTP_FROM_EMAIL")
            .map_err(|_| {
                error!("SMTP_FROM_EMAIL environment variable not found");
                ConfigError::EnvVarNotFound("SMTP_FROM_EMAIL".to_string())
            })?;

        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| {
            warn!("SMTP_FROM_NAME not set, using default");
            "Estudio Cotizaciones".to_string()
        });

        let notify_to = env::var("QUOTE_NOTIFY_TO")
            .map_err(|_| {
                error!("QUOTE_NOTIFY_TO environment variable not found");
                ConfigError::EnvVarNotFound("QUOTE_NOTIFY_TO".to_string())
            })?;
        debug!("Quote notifications go to: {}", notify_to);

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            use_tls,
            use_starttls,
            from_email,
            from_name,
            notify_to,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Email configuration loaded successfully");
        Ok(config)
    }

    /// Local mail catcher settings (e.g. MailHog on 1025)
    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            use_tls: false,
            use_starttls: false,
            from_email: "cotizaciones@example.com".to_string(),
            from_name: "Test Estudio".to_string(),
            notify_to: "studio@example.com".to_string(),
            connection_timeout_secs: 10,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.is_empty() {
            error!("SMTP host is empty");
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::ValidationError("SMTP port cannot be 0".to_string()));
        }

        if self.smtp_username.is_empty() != self.smtp_password.is_empty() {
            error!("SMTP username and password must be set together");
            return Err(ConfigError::ValidationError(
                "SMTP username and password must be set together".to_string(),
            ));
        }

        for (name, address) in [("from email", &self.from_email), ("notify address", &self.notify_to)] {
            if !address.contains('@') {
                error!("Invalid {} format", name);
                return Err(ConfigError::ValidationError(format!("Invalid {} format", name)));
            }
        }

        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::ValidationError("Connection timeout cannot be 0".to_string()));
        }

        Ok(())
    }

    pub fn get_smtp_url(&self) -> String {
        format!("{}:{}", self.smtp_host, self.smtp_port)
    }
}
