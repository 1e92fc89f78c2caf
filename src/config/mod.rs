pub mod app_conf;
pub mod client_conf;
pub mod email_conf;
pub mod whatsapp_conf;


pub use app_conf::AppConfig;
pub use client_conf::ClientConfig;
pub use email_conf::EmailConfig;
pub use whatsapp_conf::WhatsAppConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    
    #[error("Validation error: {0}")]
    ValidationError(String),
}
