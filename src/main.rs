use dotenv::dotenv;
use estudio_backend::app::app::App;
use estudio_backend::util::logger::Logger;
use tracing::{error, info, warn};


#[tokio::main]
async fn main() {
    // Load before the logger so RUST_LOG / LOG_DIR from .env apply
    let env_loaded = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialise logging: {}", e);
            std::process::exit(1);
        }
    };

    info!("🚀 Starting Estudio quote backend");
    match env_loaded {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to configure application: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = app.start().await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
