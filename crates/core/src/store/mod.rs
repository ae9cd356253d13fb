//! Persistent key-value store backed by a single-file SQLite database.
//!
//! Each store owns one connection; operations run on a background thread via
//! tokio-rusqlite. Keys are strings, values are BLOBs so a store can hold
//! both decoded page text (as UTF-8) and raw undecodable bodies.

pub mod schema;

use std::path::Path;

use crate::Error;
use tokio_rusqlite::{Connection, params, rusqlite};

/// Durable key-value store handle.
///
/// The handle is cheap to clone; all clones share the same connection.
/// Closing through any handle invalidates the rest, whose operations then
/// fail with [`Error::StoreClosed`].
#[derive(Clone, Debug)]
pub struct FileStore {
    conn: Connection,
}

impl FileStore {
    /// Open a store at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and sets up the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Self::init(conn).await
    }

    /// Open an in-memory store for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::from)?;

        schema::ensure(&conn).await?;

        Ok(Self { conn })
    }

    /// Look up a key.
    ///
    /// Returns `None` if the key is absent; a miss is not an error.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
                let result = conn.query_row("SELECT value FROM map WHERE key = ?1", params![key], |row| row.get(0));

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert a key, overwriting any previous value.
    pub async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_vec();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO map (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Remove a key. Removing an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM map WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Check whether a key exists without reading its value.
    pub async fn contains(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, rusqlite::Error> {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM map WHERE key = ?1)",
                    params![key],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(Error::from)
    }

    /// Durably commit pending writes without closing.
    pub async fn flush(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(FULL);")?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Commit and release the underlying connection.
    ///
    /// Dropping a store without closing tears the connection down as well;
    /// explicit close is still the expected shutdown path.
    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let store = FileStore::open_in_memory().await.unwrap();
        store.set("url", b"conteudo").await.unwrap();
        assert_eq!(store.get("url").await.unwrap(), Some(b"conteudo".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = FileStore::open_in_memory().await.unwrap();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = FileStore::open_in_memory().await.unwrap();
        store.set("k", b"old").await.unwrap();
        store.set("k", b"new").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let store = FileStore::open_in_memory().await.unwrap();
        store.set("k", b"v").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Absent key: still not an error.
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_contains() {
        let store = FileStore::open_in_memory().await.unwrap();
        assert!(!store.contains("k").await.unwrap());
        store.set("k", b"v").await.unwrap();
        assert!(store.contains("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_flush() {
        let store = FileStore::open_in_memory().await.unwrap();
        store.set("k", b"v").await.unwrap();
        store.flush().await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_operations_after_close_fail() {
        let store = FileStore::open_in_memory().await.unwrap();
        let survivor = store.clone();
        store.close().await.unwrap();

        let err = survivor.get("k").await.unwrap_err();
        assert!(matches!(err, Error::StoreClosed));

        let err = survivor.set("k", b"v").await.unwrap_err();
        assert!(matches!(err, Error::StoreClosed));
    }

    #[tokio::test]
    async fn test_reopen_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loja.db");

        let store = FileStore::open(&path).await.unwrap();
        store.set("url", b"conteudo").await.unwrap();
        store.close().await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("url").await.unwrap(), Some(b"conteudo".to_vec()));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_version_marker_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loja.db");

        let store = FileStore::open(&path).await.unwrap();
        store.close().await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        let version: i64 = store
            .conn
            .call(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(version, schema::SCHEMA_VERSION);
        store.close().await.unwrap();
    }
}
