// 🗄️ SQLite booking store
//
// Single `bookings` table. SQLite assigns `id` (AUTOINCREMENT, so ids are
// never reused) and `created_at` (column default, UTC, millisecond RFC 3339).

use super::{BookingError, BookingInput, BookingRecord, BookingStore, ProjectType};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

const SELECT_COLUMNS: &str = "id, name, phone, project_type, description, budget,
                timeline, audience, goal, mood, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self, BookingError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, BookingError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, BookingError> {
        setup_database(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored bookings
    pub fn count(&self) -> Result<i64, BookingError> {
        let conn = self.conn.lock().map_err(|_| BookingError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
        Ok(count)
    }
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            project_type TEXT NOT NULL,
            description TEXT,
            budget TEXT,
            timeline TEXT,
            audience TEXT,
            goal TEXT,
            mood TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookings_created_at ON bookings(created_at)",
        [],
    )?;

    Ok(())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<BookingRecord> {
    let project_type: String = row.get(3)?;
    let project_type = project_type
        .parse::<ProjectType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let created_at: String = row.get(10)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(BookingRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        project_type,
        description: row.get(4)?,
        budget: row.get(5)?,
        timeline: row.get(6)?,
        audience: row.get(7)?,
        goal: row.get(8)?,
        mood: row.get(9)?,
        created_at,
    })
}

fn fetch_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<BookingRecord>> {
    conn.query_row(
        &format!("SELECT {} FROM bookings WHERE id = ?1", SELECT_COLUMNS),
        [id],
        row_to_record,
    )
    .optional()
}

impl BookingStore for SqliteStore {
    fn create(&self, input: BookingInput) -> Result<BookingRecord, BookingError> {
        let valid = input.validate()?;
        let conn = self.conn.lock().map_err(|_| BookingError::Poisoned)?;

        conn.execute(
            "INSERT INTO bookings (
                name, phone, project_type, description, budget,
                timeline, audience, goal, mood
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                valid.name,
                valid.phone,
                valid.project_type.as_str(),
                valid.description,
                valid.budget,
                valid.timeline,
                valid.audience,
                valid.goal,
                valid.mood,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("stored booking #{} in sqlite", id);

        // Read back so created_at is the value SQLite assigned
        fetch_by_id(&conn, id)?.ok_or(BookingError::Database(rusqlite::Error::QueryReturnedNoRows))
    }

    fn list_all(&self) -> Result<Vec<BookingRecord>, BookingError> {
        let conn = self.conn.lock().map_err(|_| BookingError::Poisoned)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM bookings ORDER BY id ASC",
            SELECT_COLUMNS
        ))?;

        let bookings = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(bookings)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<BookingRecord>, BookingError> {
        let conn = self.conn.lock().map_err(|_| BookingError::Poisoned)?;
        Ok(fetch_by_id(&conn, id)?)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::booking::tests::sample_input;

    #[test]
    fn test_setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        setup_database(&conn).unwrap();
    }

    #[test]
    fn test_created_at_comes_from_database() {
        let store = SqliteStore::open_in_memory().unwrap();
        let before = Utc::now() - chrono::Duration::seconds(1);

        let record = store.create(sample_input()).unwrap();

        assert!(record.created_at >= before);
        assert!(record.created_at <= Utc::now() + chrono::Duration::seconds(1));
    }

    #[test]
    fn test_optional_fields_round_trip_through_columns() {
        let store = SqliteStore::open_in_memory().unwrap();
        let record = store
            .create(BookingInput {
                budget: Some("$2-5k".to_string()),
                timeline: Some("6 weeks".to_string()),
                audience: Some("young professionals".to_string()),
                goal: Some("launch".to_string()),
                mood: Some("warm, analog".to_string()),
                ..sample_input()
            })
            .unwrap();

        let loaded = store.get_by_id(record.id).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.mood.as_deref(), Some("warm, analog"));
    }

    #[test]
    fn test_file_backed_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "kfo-bookings-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        {
            let store = SqliteStore::open(&path).unwrap();
            store.create(sample_input()).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.list_all().unwrap()[0].name, "Ana Reyes");

        drop(reopened);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[test]
    fn test_corrupt_project_type_surfaces_as_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO bookings (name, phone, project_type) VALUES ('x', '1', 'catering')",
                [],
            )
            .unwrap();
        }

        assert!(matches!(store.list_all(), Err(BookingError::Database(_))));
    }
}
