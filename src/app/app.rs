use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use crate::config::{AppConfig, ConfigError, EmailConfig, WhatsAppConfig};
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::email::SmtpEmailService;


#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid listen address: {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct App {
    config: AppConfig,
    router: Router,
    pub quote_service: Arc<QuoteServiceImpl>,
}

impl App {
    pub fn new() -> Result<Self, AppError> {
        let config = AppConfig::from_env();
        let whatsapp = WhatsAppConfig::from_env()?;

        // A broken SMTP setup only disables notifications.
        let notifier = match EmailConfig::from_env_optional() {
            Ok(Some(email_config)) => match SmtpEmailService::new(email_config) {
                Ok(service) => Some(Arc::new(service)),
                Err(e) => {
                    warn!("Quote notifications disabled: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Quote notifications disabled: {e}");
                None
            }
        };

        let quote_service = Arc::new(QuoteServiceImpl::new(whatsapp, notifier));
        let router = Self::create_router(quote_service.clone());
        Ok(App { config, router, quote_service })
    }

    pub fn create_router(quote_service: Arc<QuoteServiceImpl>) -> Router {
        use crate::router::quote_router::quote_router;
        Router::new()
            .merge(quote_router(quote_service))
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) -> Result<(), AppError> {
        let host: std::net::IpAddr = self.config.host.parse().map_err(|_| AppError::Address(self.config.host.clone()))?;
        let addr = SocketAddr::new(host, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
