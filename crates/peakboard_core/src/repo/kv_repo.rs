//! Key-value store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide get/set/remove over string keys and string values.
//! - Encode and decode JSON collection blobs.
//!
//! # Invariants
//! - `set` is an upsert: one row per key.
//! - A missing key and a JSON `null` blob both read as an empty collection.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error for key-value reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local key-value storage, the only persistence seam of the core.
pub trait KvStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed key-value store over the `kv_entries` table.
#[derive(Clone, Copy)]
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// Reads a JSON array blob stored under `key`.
pub fn read_json_list<T, S>(store: &S, key: &str) -> RepoResult<Vec<T>>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };

    let parsed: Option<Vec<T>> = serde_json::from_str(&raw)
        .map_err(|err| RepoError::InvalidData(format!("key `{key}`: {err}")))?;
    Ok(parsed.unwrap_or_default())
}

/// Replaces the JSON array blob stored under `key`.
pub fn write_json_list<T, S>(store: &S, key: &str, items: &[T]) -> RepoResult<()>
where
    T: Serialize,
    S: KvStore + ?Sized,
{
    let encoded = serde_json::to_string(items)
        .map_err(|err| RepoError::InvalidData(format!("key `{key}`: {err}")))?;
    store.set(key, &encoded)
}
