//! `SQLite` implementation of [`MessageStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use homesync_app::ports::MessageStore;
use homesync_domain::error::HomeSyncError;
use homesync_domain::message::Message;
use homesync_domain::record::{RecordId, StoredRecord};

use crate::error::StorageError;

struct Wrapper(StoredRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let topic: String = row.try_get("topic")?;
        let payload: String = row.try_get("message")?;
        let timestamp_str: String = row.try_get("timestamp")?;

        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(StoredRecord {
            id: RecordId::new(id),
            topic,
            payload,
            timestamp,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO messages (topic, message, timestamp)
    VALUES (?, ?, ?)
";

const SELECT_LATEST: &str =
    "SELECT id, topic, message, timestamp FROM messages ORDER BY id DESC LIMIT ?";

/// `SQLite`-backed append-only message log.
///
/// Sequence ids come from the `AUTOINCREMENT` primary key, so they are
/// strictly increasing in commit order and never reused.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Create a new message store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MessageStore for SqliteMessageStore {
    async fn append(&self, message: Message) -> Result<StoredRecord, HomeSyncError> {
        let result = sqlx::query(INSERT)
            .bind(&message.topic)
            .bind(&message.payload)
            .bind(message.observed_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let id = result.last_insert_rowid();
        if id <= 0 {
            return Err(StorageError::InvalidId(id).into());
        }

        Ok(StoredRecord::from_message(RecordId::new(id), message))
    }

    async fn latest(&self, limit: usize) -> Result<Vec<StoredRecord>, HomeSyncError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_LATEST)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
