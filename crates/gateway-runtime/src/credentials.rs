//! Startup read of the persistent device table.
//!
//! Schema: `devices(device_id TEXT PRIMARY KEY, shared_secret TEXT NOT
//! NULL, created_at INTEGER NOT NULL)`. The table is opened read-only;
//! writes belong to the provisioning tooling, not the gateway.

use gateway_types::DeviceRecord;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading the device table.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The database could not be opened.
    #[error("failed to open credential store {path}: {source}")]
    Open {
        /// Offending path.
        path: PathBuf,
        /// Underlying sqlite error.
        #[source]
        source: rusqlite::Error,
    },

    /// The devices table could not be read.
    #[error("failed to read device records: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Load every device record from the table at `path`.
pub fn load_device_records(path: &Path) -> Result<Vec<DeviceRecord>, CredentialsError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|source| CredentialsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let mut stmt = conn.prepare("SELECT device_id, shared_secret, created_at FROM devices")?;
    let rows = stmt.query_map([], |row| {
        Ok(DeviceRecord {
            device_id: row.get(0)?,
            shared_secret: row.get::<_, String>(1)?.into_bytes(),
            created_at: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
