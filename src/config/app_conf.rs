use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| {
                s.parse()
                    .map_err(|_| warn!("Invalid APP_PORT value '{}', using 8080", s))
                    .ok()
            })
            .unwrap_or(8080);
        AppConfig { host, port }
    }
}
