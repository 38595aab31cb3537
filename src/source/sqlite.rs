//! Gateway backup database source

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use super::RowSource;
use crate::core::error::{Error, Result};
use crate::tags::{TagProviderRecord, TagRow};

const PROVIDERS_QUERY: &str = "SELECT TAGPROVIDERSETTINGS_ID, NAME, PROVIDERID, DESCRIPTION, \
     ENABLED, TYPEID, ALLOWBACKFILL FROM TAGPROVIDERSETTINGS ORDER BY TAGPROVIDERSETTINGS_ID";

const TAG_ROWS_QUERY: &str = "SELECT ID, PROVIDERID, FOLDERID, CFG, RANK, NAME \
     FROM TAGCONFIG WHERE PROVIDERID = ?1 ORDER BY ID";

/// Reads an `.idb` gateway configuration database.
///
/// Every call opens its own read-only connection, so one source can serve
/// several threads.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::DatabaseNotFound { path });
        }
        Ok(Self { path })
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}

impl RowSource for SqliteSource {
    fn providers(&self) -> Result<Vec<TagProviderRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(PROVIDERS_QUERY)
            .map_err(|e| missing_table("TAGPROVIDERSETTINGS", e))?;

        let rows = stmt.query_map([], |row| {
            Ok(TagProviderRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                uuid: row.get(2)?,
                description: row.get(3)?,
                enabled: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
                type_id: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                allow_back_fill: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
            })
        })?;

        let mut providers = Vec::new();
        for row in rows {
            providers.push(row?);
        }

        debug!(path = %self.path.display(), providers = providers.len(), "Read tag providers");
        Ok(providers)
    }

    fn tag_rows(&self, provider_id: i32) -> Result<Vec<TagRow>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(TAG_ROWS_QUERY)
            .map_err(|e| missing_table("TAGCONFIG", e))?;

        // Column types are not trusted; a value that doesn't decode becomes
        // absent and the loader decides whether the row survives.
        let rows = stmt.query_map(params![provider_id], |row| {
            Ok(TagRow {
                id: text(row.get_ref(0)?).unwrap_or_default(),
                provider_id,
                folder_id: text(row.get_ref(2)?),
                config: text(row.get_ref(3)?),
                rank: match row.get_ref(4)? {
                    ValueRef::Integer(rank) => i32::try_from(rank).unwrap_or(0),
                    _ => 0,
                },
                name: text(row.get_ref(5)?),
            })
        })?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }

        debug!(provider = provider_id, rows = tags.len(), "Read tag rows");
        Ok(tags)
    }
}

/// Text content of a loosely typed column
fn text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            std::str::from_utf8(bytes).ok().map(str::to_string)
        }
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(_) | ValueRef::Null => None,
    }
}

fn missing_table(table: &str, err: rusqlite::Error) -> Error {
    Error::DatabaseError {
        message: format!("cannot read {} (not a gateway backup?): {}", table, err),
    }
}

// =============================================================================
// TESTS
// =============================================================================
