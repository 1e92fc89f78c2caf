use crate::config::{ConfigError, EmailConfig};
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info, instrument};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: String, subject: String) -> Self {
        Self {
            to,
            subject,
            text_body: None,
            html_body: None,
        }
    }

    pub fn with_text_body(mut self, body: String) -> Self {
        self.text_body = Some(body);
        self
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }
}

/// Sends quote notifications over SMTP.
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");

        config.validate()?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;

            if config.use_starttls {
                transport_builder = transport_builder.tls(Tls::Required(tls_parameters));
            } else {
                transport_builder = transport_builder.tls(Tls::Wrapper(tls_parameters));
            }
        } else {
            transport_builder = transport_builder.tls(Tls::None);
        }

        if !config.smtp_username.is_empty() {
            transport_builder = transport_builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        let transport = transport_builder.build();

        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        let email_message = self.build_message(message)?;

        self.transport.send(email_message).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(format!("Failed to send email: {}", e))
        })?;

        info!("Email sent successfully");
        Ok(())
    }

    /// Notifies the studio inbox that a quote request was logged.
    #[instrument(skip(self, lines), fields(ticket_id = %ticket_id))]
    pub async fn send_quote_notification(&self, ticket_id: &str, lines: &[String]) -> Result<(), EmailError> {
        let message = build_quote_notification(&self.config.notify_to, ticket_id, lines);
        self.send_email(message).await
    }

    fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message
            .to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        let builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email_message.subject);

        match (email_message.text_body, email_message.html_body) {
            (Some(text), Some(html)) => builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text))
                        .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html)),
                )
                .map_err(|e| EmailError::MessageError(format!("Failed to build multipart message: {}", e))),
            (Some(text), None) => builder
                .body(text)
                .map_err(|e| EmailError::MessageError(format!("Failed to build text message: {}", e))),
            (None, Some(html)) => builder
                .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html))
                .map_err(|e| EmailError::MessageError(format!("Failed to build HTML message: {}", e))),
            (None, None) => Err(EmailError::MessageError("No message body provided".to_string())),
        }
    }
}

/// Text and HTML notification for one logged quote.
pub fn build_quote_notification(to: &str, ticket_id: &str, lines: &[String]) -> EmailMessage {
    let text_body = format!(
        "Nueva solicitud de cotización ({ticket_id})\n\n{}\n",
        lines.join("\n")
    );

    let items: String = lines
        .iter()
        .map(|l| format!("<li>{}</li>", html_escape::encode_text(l)))
        .collect();
    let html_body = format!(
        r#"<!DOCTYPE html>
<html lang="es">
<body style="font-family: Arial, sans-serif; color: #333;">
    <h2>Nueva solicitud de cotización</h2>
    <p>Referencia: <strong>{ticket}</strong></p>
    <ul>{items}</ul>
</body>
</html>"#,
        ticket = html_escape::encode_text(ticket_id),
        items = items,
    );

    EmailMessage::new(to.to_string(), format!("Cotización {}", ticket_id))
        .with_text_body(text_body)
        .with_html_body(html_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_notification_escapes_html() {
        let lines = vec!["Nombre: <Ana>".to_string(), "Distrito: Miraflores".to_string()];
        let message = build_quote_notification("studio@example.com", "AZO-40", &lines);

        assert_eq!(message.subject, "Cotización AZO-40");
        let text = message.text_body.unwrap();
        assert!(text.contains("Nombre: <Ana>"));
        let html = message.html_body.unwrap();
        assert!(html.contains("Nombre: &lt;Ana&gt;"));
        assert!(html.contains("<li>Distrito: Miraflores</li>"));
    }

    #[test]
    fn test_service_rejects_invalid_config() {
        let mut config = EmailConfig::from_test_env();
        config.smtp_host = String::new();
        assert!(matches!(SmtpEmailService::new(config), Err(EmailError::ConfigError(_))));
    }
}
