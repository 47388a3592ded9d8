//! Storage-specific error type wrapping sqlx errors.

use homesync_domain::error::HomeSyncError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The database assigned an id outside the valid range.
    #[error("invalid record id {0}")]
    InvalidId(i64),
}

impl From<StorageError> for HomeSyncError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
