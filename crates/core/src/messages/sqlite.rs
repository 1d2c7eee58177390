use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{MessageKind, MessageStore, MessageStoreError, NewMessage, StoredMessage};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL DEFAULT 'contact',
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        message TEXT NOT NULL,
        timestamp TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);
"#;

/// SQLite-backed message store
pub struct SqliteMessageStore {
    conn: Mutex<Connection>,
}

impl SqliteMessageStore {
    /// Open (or create) the database file and ensure the table exists
    pub fn new(path: &Path) -> Result<Self, MessageStoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| MessageStoreError::Database(e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(|e| MessageStoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, MessageStoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| MessageStoreError::Database(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, MessageStoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| MessageStoreError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, MessageStoreError> {
        self.conn
            .lock()
            .map_err(|_| MessageStoreError::Database("connection mutex poisoned".to_string()))
    }
}

impl MessageStore for SqliteMessageStore {
    fn insert(&self, message: &NewMessage) -> Result<StoredMessage, MessageStoreError> {
        let conn = self.lock()?;
        let timestamp = Utc::now();

        conn.execute(
            "INSERT INTO messages (kind, name, email, message, timestamp) VALUES (?, ?, ?, ?, ?)",
            params![
                message.kind.as_str(),
                message.name,
                message.email,
                message.message,
                timestamp.to_rfc3339(),
            ],
        )
        .map_err(|e| MessageStoreError::Database(e.to_string()))?;

        Ok(StoredMessage {
            id: conn.last_insert_rowid(),
            kind: message.kind,
            name: message.name.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
            timestamp,
        })
    }

    fn list(&self, limit: i64) -> Result<Vec<StoredMessage>, MessageStoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, kind, name, email, message, timestamp FROM messages ORDER BY id DESC LIMIT ?",
            )
            .map_err(|e| MessageStoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit], |row| {
                let id: i64 = row.get(0)?;
                let kind: String = row.get(1)?;
                let name: String = row.get(2)?;
                let email: String = row.get(3)?;
                let message: String = row.get(4)?;
                let timestamp: String = row.get(5)?;
                Ok((id, kind, name, email, message, timestamp))
            })
            .map_err(|e| MessageStoreError::Database(e.to_string()))?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, kind, name, email, message, timestamp) =
                row.map_err(|e| MessageStoreError::Database(e.to_string()))?;

            let kind = MessageKind::parse(&kind)
                .ok_or_else(|| MessageStoreError::Corrupt(format!("unknown kind: {}", kind)))?;
            let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&timestamp)
                .map_err(|e| MessageStoreError::Corrupt(format!("Invalid timestamp: {}", e)))?
                .into();

            messages.push(StoredMessage {
                id,
                kind,
                name,
                email,
                message,
                timestamp,
            });
        }

        Ok(messages)
    }

    fn count(&self) -> Result<i64, MessageStoreError> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(|e| MessageStoreError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(kind: MessageKind, name: &str) -> NewMessage {
        NewMessage {
            kind,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: format!("Hello from {}", name),
        }
    }

    #[test]
    fn test_insert_and_list() {
        let store = SqliteMessageStore::in_memory().unwrap();

        let first = store.insert(&new_message(MessageKind::Contact, "Ada")).unwrap();
        let second = store
            .insert(&new_message(MessageKind::Feedback, "Grace"))
            .unwrap();
        assert!(second.id > first.id);

        let listed = store.list(10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Grace");
        assert_eq!(listed[0].kind, MessageKind::Feedback);
        assert_eq!(listed[1].email, "ada@example.com");
    }

    #[test]
    fn test_count() {
        let store = SqliteMessageStore::in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);

        store.insert(&new_message(MessageKind::Contact, "Ada")).unwrap();
        store.insert(&new_message(MessageKind::Contact, "Alan")).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_list_respects_limit() {
        let store = SqliteMessageStore::in_memory().unwrap();
        for name in ["A", "B", "C"] {
            store.insert(&new_message(MessageKind::Contact, name)).unwrap();
        }
        assert_eq!(store.list(2).unwrap().len(), 2);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("messages.db");

        {
            let store = SqliteMessageStore::new(&path).unwrap();
            store.insert(&new_message(MessageKind::Contact, "Ada")).unwrap();
        }

        let reopened = SqliteMessageStore::new(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
