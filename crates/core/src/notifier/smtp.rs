//! SMTP notifier built on lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{notification_body, notification_subject, Notifier, NotifyError};
use crate::config::SmtpConfig;
use crate::messages::StoredMessage;

const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Sends one plain-text mail per stored message over STARTTLS.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let sender_address = if config.sender.is_empty() {
            &config.username
        } else {
            &config.sender
        };
        let sender = parse_mailbox(sender_address)?;
        let recipient = parse_mailbox(&config.recipient)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(config.port)
            .timeout(Some(SMTP_TIMEOUT));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
            recipient,
        })
    }

    fn compose(&self, message: &StoredMessage) -> Result<Message, NotifyError> {
        let reply_to = parse_mailbox(&message.email)?;

        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .reply_to(reply_to)
            .subject(notification_subject(message))
            .header(ContentType::TEXT_PLAIN)
            .body(notification_body(message))
            .map_err(|e| NotifyError::Compose(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::Address(format!("{}: {}", address, e)))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn notify(&self, message: &StoredMessage) -> Result<(), NotifyError> {
        let email = self.compose(message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        tracing::info!(id = message.id, kind = message.kind.as_str(), "Notification sent");
        Ok(())
    }
}
