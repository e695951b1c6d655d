//! SMTP mail transport (STARTTLS with login credentials).

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use nency_core::config::MailConfig;

use crate::error::ActionError;
use crate::handler::MailTransport;
use crate::types::Collaborator;

/// Build a plain-text message from `sender` to `recipient`.
pub fn build_message(
    sender: &str,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<Message, ActionError> {
    let from: Mailbox = sender
        .trim()
        .parse()
        .map_err(|e| ActionError::InvalidPayload(format!("invalid sender address: {}", e)))?;
    let to: Mailbox = recipient
        .trim()
        .parse()
        .map_err(|e| ActionError::InvalidPayload(format!("invalid recipient address: {}", e)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| ActionError::InvalidPayload(e.to_string()))
}

/// Sends mail through an authenticated SMTP relay.
pub struct SmtpMailTransport {
    config: MailConfig,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> Result<Self, ActionError> {
        if config.smtp_host.trim().is_empty() {
            return Err(ActionError::InvalidPayload(
                "SMTP host must not be empty".to_string(),
            ));
        }
        Ok(Self {
            config: config.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.address.trim().is_empty() && !self.config.password.is_empty()
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, ActionError> {
        let credentials = Credentials::new(
            self.config.address.trim().to_string(),
            self.config.password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| ActionError::external(Collaborator::Mail, e))?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ActionError> {
        if !self.is_configured() {
            return Err(ActionError::Unavailable(Collaborator::Mail));
        }

        let message = build_message(&self.config.address, recipient, subject, body)?;
        let transport = self.transport()?;

        transport
            .send(message)
            .await
            .map_err(|e| ActionError::external(Collaborator::Mail, e))?;

        tracing::info!(recipient = %recipient, "Email sent");
        Ok(())
    }
}
