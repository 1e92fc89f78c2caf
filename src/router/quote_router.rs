use axum::{Router, routing::post, extract::DefaultBodyLimit};
use crate::handler::quote_handler::{log_quote_handler, preview_quote_handler};
use std::sync::Arc;
use crate::service::quote_service::QuoteServiceImpl;

/// Largest quote body buffered; anything bigger gets a failure envelope.
pub const QUOTE_BODY_LIMIT: usize = 8 * 1024 * 1024;


pub fn quote_router(service: Arc<QuoteServiceImpl>) -> Router {
    Router::new()
        .route("/api/quote", post(log_quote_handler))
        .route("/api/quote/preview", post(preview_quote_handler))
        .layer(DefaultBodyLimit::max(QUOTE_BODY_LIMIT))
        .with_state(service)
}
