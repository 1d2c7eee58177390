//! Persistent store for contact and feedback messages.

mod sqlite;
mod store;

pub use sqlite::SqliteMessageStore;
pub use store::{MessageKind, MessageStore, MessageStoreError, NewMessage, StoredMessage};
