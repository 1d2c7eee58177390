//! Best-effort notifications for stored contact and feedback messages.

mod smtp;

pub use smtp::SmtpNotifier;

use async_trait::async_trait;
use thiserror::Error;

use crate::messages::{MessageKind, StoredMessage};

/// Errors from sending a notification. Never surfaced to the submitter.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid mail address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Compose(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, message: &StoredMessage) -> Result<(), NotifyError>;
}

/// Notifier used when no mail transport is configured.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    fn name(&self) -> &str {
        "none"
    }

    async fn notify(&self, message: &StoredMessage) -> Result<(), NotifyError> {
        tracing::debug!(id = message.id, "Notifications disabled, skipping");
        Ok(())
    }
}

/// Subject line for a stored message.
pub fn notification_subject(message: &StoredMessage) -> String {
    let label = match message.kind {
        MessageKind::Contact => "Contact Message",
        MessageKind::Feedback => "Feedback",
    };
    let name: String = message.name.chars().take(50).collect();
    format!("New FetchFlicks {} from {}", label, name)
}

/// Plain-text body for a stored message.
pub fn notification_body(message: &StoredMessage) -> String {
    format!(
        "New {kind} received from the FetchFlicks website:\n\n\
         From: {name} <{email}>\n\
         Message: {text}\n\n\
         Timestamp: {ts}\n\n\
         ---\n\
         Reply directly to this email to respond to {name} at {email}\n",
        kind = message.kind.as_str(),
        name = message.name,
        email = message.email,
        text = message.message,
        ts = message.timestamp.format("%Y-%m-%d %H:%M:%S"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stored(kind: MessageKind, name: &str) -> StoredMessage {
        StoredMessage {
            id: 7,
            kind,
            name: name.to_string(),
            email: "ada@example.com".to_string(),
            message: "Love it".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_subject_by_kind() {
        assert_eq!(
            notification_subject(&stored(MessageKind::Contact, "Ada")),
            "New FetchFlicks Contact Message from Ada"
        );
        assert_eq!(
            notification_subject(&stored(MessageKind::Feedback, "Ada")),
            "New FetchFlicks Feedback from Ada"
        );
    }

    #[test]
    fn test_subject_truncates_long_names() {
        let subject = notification_subject(&stored(MessageKind::Contact, &"n".repeat(80)));
        assert!(subject.ends_with(&"n".repeat(50)));
        assert!(!subject.ends_with(&"n".repeat(51)));
    }

    #[test]
    fn test_body_contents() {
        let body = notification_body(&stored(MessageKind::Feedback, "Ada"));
        assert!(body.contains("From: Ada <ada@example.com>"));
        assert!(body.contains("Message: Love it"));
        assert!(body.contains("Timestamp: 2024-05-01 12:30:00"));
    }

    #[tokio::test]
    async fn test_noop_notifier_succeeds() {
        let notifier = NoopNotifier;
        assert!(notifier
            .notify(&stored(MessageKind::Contact, "Ada"))
            .await
            .is_ok());
    }
}
