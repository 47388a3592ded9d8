//! # homesync-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `MessageStore` port trait defined in `homesync-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between stored records and database rows
//!
//! ## Dependency rule
//! Depends on `homesync-app` (for port traits) and `homesync-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod message_store;
mod pool;

pub use error::StorageError;
pub use message_store::SqliteMessageStore;
pub use pool::{Config, Database};
