//! Store schema setup.
//!
//! Each store holds a single `map` table. A schema-version marker goes into
//! `PRAGMA user_version` when the table is first created; it is reserved for
//! future migration and existing tables are trusted as-is on open.

use crate::Error;
use tokio_rusqlite::{Connection, rusqlite};

/// Version stamped into `user_version` at table creation.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the `map` table if it is absent.
///
/// Creating an already-existing schema is not an error. The version marker
/// is written only on first creation.
pub async fn ensure(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), rusqlite::Error> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='map')",
            [],
            |row| row.get(0),
        )?;

        if !exists {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS map (
                    key TEXT PRIMARY KEY,
                    value BLOB NOT NULL
                )",
                [],
            )?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
