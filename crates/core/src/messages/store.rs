use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageStoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid stored value: {0}")]
    Corrupt(String),
}

/// Which form a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Contact,
    Feedback,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Feedback => "feedback",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contact" => Some(Self::Contact),
            "feedback" => Some(Self::Feedback),
            _ => None,
        }
    }
}

/// A validated message about to be appended.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub kind: MessageKind,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A row of the message table.
#[derive(Debug, Clone, Serialize)]
pub struct StoredMessage {
    pub id: i64,
    pub kind: MessageKind,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only message storage.
pub trait MessageStore: Send + Sync {
    /// Append a message, returning the stored row.
    fn insert(&self, message: &NewMessage) -> Result<StoredMessage, MessageStoreError>;

    /// Most recent messages first.
    fn list(&self, limit: i64) -> Result<Vec<StoredMessage>, MessageStoreError>;

    fn count(&self) -> Result<i64, MessageStoreError>;
}
