//! SQLite persistence for extraction results.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::models::record::ExtractionResult;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store handle shared between async tasks.
pub type SharedStore = Arc<Mutex<RecordStore>>;

/// A persisted extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i64,
    pub file_path: String,
    /// `None` when the document's RADICADO was not found.
    pub radicado: Option<String>,
    pub fields: ExtractionResult,
    pub processed_at: DateTime<Utc>,
}

/// Extraction records kept in a single SQLite table.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::create_schema(&conn)?;
        debug!("Opened record store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Wrap the store for sharing.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS extractions (
                id INTEGER PRIMARY KEY,
                file_path TEXT NOT NULL,
                radicado TEXT,
                fields TEXT NOT NULL,        -- JSON object, one key per field
                processed_at TEXT NOT NULL   -- RFC 3339
            );

            CREATE INDEX IF NOT EXISTS idx_extractions_radicado
                ON extractions(radicado);
            "#,
        )?;
        Ok(())
    }

    /// Persist one result and return its row id.
    pub fn save(&self, file_path: &Path, result: &ExtractionResult) -> Result<i64> {
        let fields = serde_json::to_string(result)?;
        let processed_at = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO extractions (file_path, radicado, fields, processed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                file_path.to_string_lossy(),
                result.radicado(),
                fields,
                processed_at
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Stored extraction {} for {}", id, file_path.display());
        Ok(id)
    }

    /// Most recent records first.
    pub fn list(&self, limit: usize) -> Result<Vec<StoredRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_path, radicado, fields, processed_at
             FROM extractions ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], RawRecord::from_row)?;
        collect(rows)
    }

    /// All records carrying the given settlement number, oldest first.
    pub fn find_by_radicado(&self, radicado: &str) -> Result<Vec<StoredRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_path, radicado, fields, processed_at
             FROM extractions WHERE radicado = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![radicado], RawRecord::from_row)?;
        collect(rows)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM extractions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

struct RawRecord {
    id: i64,
    file_path: String,
    radicado: Option<String>,
    fields: String,
    processed_at: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            file_path: row.get(1)?,
            radicado: row.get(2)?,
            fields: row.get(3)?,
            processed_at: row.get(4)?,
        })
    }

    fn decode(self) -> Result<StoredRecord> {
        Ok(StoredRecord {
            id: self.id,
            file_path: self.file_path,
            radicado: self.radicado,
            fields: serde_json::from_str(&self.fields)?,
            processed_at: DateTime::parse_from_rfc3339(&self.processed_at)?.with_timezone(&Utc),
        })
    }
}

fn collect<I>(rows: I) -> Result<Vec<StoredRecord>>
where
    I: Iterator<Item = rusqlite::Result<RawRecord>>,
{
    rows.map(|row| row.map_err(StoreError::from).and_then(RawRecord::decode))
        .collect()
}
