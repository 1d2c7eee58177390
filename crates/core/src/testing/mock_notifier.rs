//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::messages::StoredMessage;
use crate::notifier::{Notifier, NotifyError};

/// Mock implementation of the Notifier trait that records every message.
#[derive(Debug, Default)]
pub struct MockNotifier {
    notified: Arc<Mutex<Vec<StoredMessage>>>,
    fail: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every notification fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn notified(&self) -> Vec<StoredMessage> {
        lock(&self.notified).clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(&self, message: &StoredMessage) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport("mock transport down".to_string()));
        }
        lock(&self.notified).push(message.clone());
        Ok(())
    }
}
