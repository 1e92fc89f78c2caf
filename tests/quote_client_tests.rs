use estudio_backend::app::app::App;
use estudio_backend::client::quote_client::{ClientError, LogOutcome, QuoteClient};
use estudio_backend::config::{ClientConfig, WhatsAppConfig};
use estudio_backend::model::quote::QuoteField;
use estudio_backend::service::quote_form::QuoteForm;
use estudio_backend::service::quote_service::QuoteServiceImpl;
use estudio_backend::service::ticket_counter::{FileTicketCounter, MemoryTicketCounter, TicketCounter};
use std::net::SocketAddr;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();
}

fn whatsapp() -> WhatsAppConfig {
    WhatsAppConfig::new("+51 999 888 777")
}

/// Serves the real router on a loopback port.
async fn spawn_server() -> SocketAddr {
    let service = Arc::new(QuoteServiceImpl::new(whatsapp(), None));
    let router = App::create_router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn filled_form() -> QuoteForm {
    let mut form = QuoteForm::new();
    form.update(QuoteField::ProjectType, "Azotea");
    form.update(QuoteField::Area, "40");
    form.update(QuoteField::District, "Miraflores");
    form.update(QuoteField::Name, "Ana");
    form
}

#[tokio::test]
async fn test_submit_logs_and_returns_deep_link() {
    init_tracing();
    let addr = spawn_server().await;
    let counter = Arc::new(MemoryTicketCounter::starting_at(4));
    let client = QuoteClient::new(format!("http://{}/api/quote", addr), whatsapp(), counter.clone());

    let mut form = filled_form();
    let outcome = client.submit(&mut form).await.unwrap();

    assert_eq!(outcome.ticket_number, 5);
    assert_eq!(outcome.smart_id, "AZO-40-MIR-ANA");
    assert_eq!(
        outcome.logging,
        LogOutcome::Acknowledged { ticket_id: Some("COT-0005-AZO-40-MIR-ANA".to_string()) }
    );
    assert!(outcome.deep_link.starts_with("https://wa.me/51999888777?text="));
    assert!(outcome.message.contains("Nombre: Ana"));
    assert_eq!(form, QuoteForm::new(), "form is reset after submit");
    assert_eq!(counter.current().await.unwrap(), 5);
}

#[tokio::test]
async fn test_deep_link_issued_when_logging_unreachable() {
    init_tracing();
    let addr = dead_address().await;
    let counter = Arc::new(MemoryTicketCounter::default());
    let client = QuoteClient::new(format!("http://{}/api/quote", addr), whatsapp(), counter);

    let outcome = client.submit(&mut filled_form()).await.unwrap();

    assert!(matches!(outcome.logging, LogOutcome::Failed { .. }));
    assert!(!outcome.logging.is_acknowledged());
    assert!(outcome.deep_link.contains("Miraflores"));
    assert_eq!(outcome.ticket_number, 1);
}

#[tokio::test]
async fn test_error_status_is_reported_as_failure() {
    let addr = spawn_server().await;
    let counter = Arc::new(MemoryTicketCounter::default());
    let client = QuoteClient::new(format!("http://{}/api/nowhere", addr), whatsapp(), counter);

    let outcome = client.submit(&mut filled_form()).await.unwrap();
    match outcome.logging {
        LogOutcome::Failed { reason } => assert!(reason.contains("404")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_incomplete_form_is_refused_without_ticket() {
    let addr = spawn_server().await;
    let counter = Arc::new(MemoryTicketCounter::default());
    let client = QuoteClient::new(format!("http://{}/api/quote", addr), whatsapp(), counter.clone());

    let mut form = filled_form();
    form.update(QuoteField::District, "");
    let result = client.submit(&mut form).await;

    match result {
        Err(ClientError::MissingFields(fields)) => assert_eq!(fields, vec![QuoteField::District]),
        other => panic!("expected MissingFields, got {:?}", other.map(|o| o.ticket_number)),
    }
    assert_eq!(counter.current().await.unwrap(), 0);
    assert_eq!(form.request().name, "Ana", "refused form keeps its values");
}

#[tokio::test]
async fn test_consecutive_submits_use_file_counter() {
    let addr = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let counter = Arc::new(FileTicketCounter::new(dir.path().join("ticket_counter")));
    let client = QuoteClient::new(format!("http://{}/api/quote", addr), whatsapp(), counter.clone());

    for expected in 1..=3 {
        let outcome = client.submit(&mut filled_form()).await.unwrap();
        assert_eq!(outcome.ticket_number, expected);
        assert!(outcome.logging.is_acknowledged());
    }

    let stored = std::fs::read_to_string(dir.path().join("ticket_counter")).unwrap();
    assert_eq!(stored, "3");
}

#[tokio::test]
async fn test_client_built_from_config_uses_counter_file() {
    init_tracing();
    let addr = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let counter_path = dir.path().join("data").join("ticket_counter");
    std::fs::create_dir_all(counter_path.parent().unwrap()).unwrap();
    std::fs::write(&counter_path, "9").unwrap();

    let config = ClientConfig {
        endpoint: format!("http://{}/api/quote", addr),
        counter_path: counter_path.clone(),
        whatsapp: whatsapp(),
    };
    config.validate().unwrap();
    let client = QuoteClient::from_config(config);

    let outcome = client.submit(&mut filled_form()).await.unwrap();
    assert_eq!(outcome.ticket_number, 10);
    assert_eq!(
        outcome.logging,
        LogOutcome::Acknowledged { ticket_id: Some("COT-0010-AZO-40-MIR-ANA".to_string()) }
    );
    assert!(outcome.deep_link.starts_with("https://wa.me/51999888777?text="));
    assert_eq!(std::fs::read_to_string(&counter_path).unwrap(), "10");
}
