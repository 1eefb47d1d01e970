//! Task slot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the serialized task collection under one fixed slot key.
//! - Decode persisted payloads defensively on load.
//!
//! # Invariants
//! - The slot payload is a JSON array of `{id, text, completed}` objects in
//!   insertion order.
//! - A missing slot row means "first run": empty collection, no recovery.
//! - A malformed payload is recovered as an empty collection and surfaced
//!   through [`LoadedSlot::recovery`], never as a hard error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::Task;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed slot key the task collection is stored under.
pub const TASKS_SLOT_KEY: &str = "tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence operations.
///
/// Semantic no-ops (missing slot, malformed payload) are not errors; only
/// storage transport and misconfiguration surface here.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode slot payload: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
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

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Recovery note attached to a load that fell back to an empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRecovery {
    /// Stored payload was present but could not be decoded as a task array.
    MalformedPayload { detail: String },
}

impl Display for SlotRecovery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedPayload { detail } => {
                write!(f, "malformed slot payload: {detail}")
            }
        }
    }
}

/// Result of loading the task slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSlot {
    /// Decoded tasks in insertion order; empty on first run or recovery.
    pub tasks: Vec<Task>,
    /// Present when the stored payload was discarded during load.
    pub recovery: Option<SlotRecovery>,
}

/// Persistence contract for the task collection slot.
pub trait TaskSlotRepository {
    fn load_slot(&self) -> RepoResult<LoadedSlot>;
    fn save_slot(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteTaskSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskSlotRepository<'conn> {
    /// Wraps a migrated connection after validating its schema state.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not match
    ///   the latest migration known to this binary.
    /// - `MissingRequiredTable` when `kv_slots` is absent despite the
    ///   version matching.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_slots';",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            return Err(RepoError::MissingRequiredTable("kv_slots"));
        }

        Ok(Self { conn })
    }
}

impl TaskSlotRepository for SqliteTaskSlotRepository<'_> {
    fn load_slot(&self) -> RepoResult<LoadedSlot> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM kv_slots WHERE slot_key = ?1;",
                [TASKS_SLOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(LoadedSlot {
                tasks: Vec::new(),
                recovery: None,
            });
        };

        match serde_json::from_str::<Vec<Task>>(&payload) {
            Ok(tasks) => Ok(LoadedSlot {
                tasks,
                recovery: None,
            }),
            Err(err) => Ok(LoadedSlot {
                tasks: Vec::new(),
                recovery: Some(SlotRecovery::MalformedPayload {
                    detail: err.to_string(),
                }),
            }),
        }
    }

    fn save_slot(&self, tasks: &[Task]) -> RepoResult<()> {
        let payload = serde_json::to_string(tasks)?;
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, payload) VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![TASKS_SLOT_KEY, payload],
        )?;
        Ok(())
    }
}
