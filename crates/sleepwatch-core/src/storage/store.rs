//! Keyed schedule persistence.
//!
//! The schedule lives as one JSON document under [`SCHEDULE_KEY`] in a
//! SQLite key-value table. The monitor only reads it once at startup.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::StoreError;
use crate::schedule::SleepSchedule;

/// Key the schedule document is stored under.
pub const SCHEDULE_KEY: &str = "userData";

/// Persistence boundary for the sleep schedule.
pub trait ScheduleStore: Send + Sync {
    /// `Ok(None)` when no schedule has been saved.
    fn load(&self) -> Result<Option<SleepSchedule>, StoreError>;

    fn save(&self, schedule: &SleepSchedule) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// SQLite-backed store at `~/.config/sleepwatch/sleepwatch.db`.
pub struct SqliteScheduleStore {
    conn: Mutex<Connection>,
}

impl SqliteScheduleStore {
    /// Open the default database, creating file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Self::open_at(&dir.join("sleepwatch.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Locked)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StoreError> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn load(&self) -> Result<Option<SleepSchedule>, StoreError> {
        let Some(json) = self.kv_get(SCHEDULE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: SCHEDULE_KEY.to_string(),
                message: e.to_string(),
            })
    }

    fn save(&self, schedule: &SleepSchedule) -> Result<(), StoreError> {
        let json = serde_json::to_string(schedule).map_err(|e| StoreError::Corrupt {
            key: SCHEDULE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(SCHEDULE_KEY, &json)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.kv_delete(SCHEDULE_KEY)
    }
}

/// In-process store, for tests and embedding hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    slot: Mutex<Option<SleepSchedule>>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: SleepSchedule) -> Self {
        Self {
            slot: Mutex::new(Some(schedule)),
        }
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn load(&self) -> Result<Option<SleepSchedule>, StoreError> {
        Ok(self.slot.lock().map_err(|_| StoreError::Locked)?.clone())
    }

    fn save(&self, schedule: &SleepSchedule) -> Result<(), StoreError> {
        *self.slot.lock().map_err(|_| StoreError::Locked)? = Some(schedule.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().map_err(|_| StoreError::Locked)? = None;
        Ok(())
    }
}

/// Load the schedule the monitor should run with.
///
/// Absent and unreadable schedules both yield `None`; the caller should send
/// the user to schedule setup. Read failures are logged, never propagated.
pub fn load_schedule_for_monitoring(store: &dyn ScheduleStore) -> Option<SleepSchedule> {
    match store.load() {
        Ok(Some(schedule)) => Some(schedule),
        Ok(None) => {
            tracing::info!("No sleep schedule stored");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load sleep schedule; treating as absent");
            None
        }
    }
}
