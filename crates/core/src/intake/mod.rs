//! Contact and feedback intake: validate, persist, notify.

mod error;
mod validate;

pub use error::{InputError, IntakeError};
pub use validate::{
    is_valid_email, validate_link, validate_submission, Submission, DENYLIST, MAX_MESSAGE,
    MAX_SHORT_FIELD,
};

use std::sync::Arc;

use crate::messages::{MessageKind, MessageStore, NewMessage, StoredMessage};
use crate::metrics;
use crate::notifier::Notifier;

/// Accepts form submissions and records them.
pub struct IntakeService {
    store: Arc<dyn MessageStore>,
    notifier: Arc<dyn Notifier>,
}

impl IntakeService {
    pub fn new(store: Arc<dyn MessageStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    /// Validate and store a submission, then notify best effort.
    ///
    /// A failed notification is logged and does not fail the submission.
    pub async fn submit(
        &self,
        kind: MessageKind,
        submission: &Submission,
    ) -> Result<StoredMessage, IntakeError> {
        let submission = submission.trimmed();
        if let Err(e) = validate_submission(&submission) {
            metrics::MESSAGES_REJECTED
                .with_label_values(&[kind.as_str()])
                .inc();
            return Err(e.into());
        }

        let stored = self
            .store
            .insert(&NewMessage {
                kind,
                name: submission.name,
                email: submission.email,
                message: submission.message,
            })
            .map_err(|e| {
                tracing::error!(kind = kind.as_str(), error = %e, "Failed to store message");
                e
            })?;

        metrics::MESSAGES_STORED
            .with_label_values(&[kind.as_str()])
            .inc();
        tracing::info!(id = stored.id, kind = kind.as_str(), "Message stored");

        if let Err(e) = self.notifier.notify(&stored).await {
            metrics::NOTIFICATION_FAILURES.inc();
            tracing::warn!(
                id = stored.id,
                notifier = self.notifier.name(),
                error = %e,
                "Failed to send notification"
            );
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageStoreError, SqliteMessageStore};
    use crate::testing::MockNotifier;

    fn service() -> (IntakeService, Arc<SqliteMessageStore>, Arc<MockNotifier>) {
        let store = Arc::new(SqliteMessageStore::in_memory().unwrap());
        let notifier = Arc::new(MockNotifier::new());
        let service = IntakeService::new(store.clone(), notifier.clone());
        (service, store, notifier)
    }

    #[tokio::test]
    async fn test_submit_stores_and_notifies() {
        let (service, store, notifier) = service();

        let stored = service
            .submit(
                MessageKind::Contact,
                &Submission::new("  Ada ", "ada@example.com", " Hello there "),
            )
            .await
            .unwrap();

        assert_eq!(stored.name, "Ada");
        assert_eq!(stored.message, "Hello there");
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(notifier.notified().len(), 1);
        assert_eq!(notifier.notified()[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_invalid_email_is_not_stored() {
        let (service, store, notifier) = service();

        let err = service
            .submit(
                MessageKind::Feedback,
                &Submission::new("Ada", "not-an-email", "Hi"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, IntakeError::Invalid(InputError::InvalidEmail)));
        assert!(err.user_message().contains("valid email"));
        assert_eq!(store.count().unwrap(), 0);
        assert!(notifier.notified().is_empty());
    }

    #[tokio::test]
    async fn test_denylisted_content_any_case_is_rejected() {
        let (service, store, _) = service();

        for text in ["<SCRIPT>alert(1)", "JavaScript:void(0)", "DaTa:text/html"] {
            let err = service
                .submit(
                    MessageKind::Contact,
                    &Submission::new("Ada", "ada@example.com", text),
                )
                .await
                .unwrap_err();
            assert_eq!(err.user_message(), "Invalid content detected.");
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_notification_failure_is_swallowed() {
        let (service, store, notifier) = service();
        notifier.set_fail(true);

        let result = service
            .submit(
                MessageKind::Feedback,
                &Submission::new("Ada", "ada@example.com", "Great site"),
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(store.count().unwrap(), 1);
    }

    struct FailingStore;

    impl MessageStore for FailingStore {
        fn insert(&self, _message: &NewMessage) -> Result<StoredMessage, MessageStoreError> {
            Err(MessageStoreError::Database("disk full".to_string()))
        }

        fn list(&self, _limit: i64) -> Result<Vec<StoredMessage>, MessageStoreError> {
            Ok(Vec::new())
        }

        fn count(&self) -> Result<i64, MessageStoreError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_store_failure_has_generic_message() {
        let notifier = Arc::new(MockNotifier::new());
        let service = IntakeService::new(Arc::new(FailingStore), notifier.clone());

        let err = service
            .submit(
                MessageKind::Contact,
                &Submission::new("Ada", "ada@example.com", "Hello"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, IntakeError::Store(_)));
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert!(notifier.notified().is_empty());
    }
}
