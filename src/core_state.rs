//! Application state shared by every request handler.
//!
//! Holds the single SQLite connection behind a mutex. Handlers lock it for
//! the duration of their database work only.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Lock poisoned")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct CoreState {
    conn: Mutex<Connection>,
    started_at: Instant,
}

impl CoreState {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Inspection database opened");
        Ok(Self::with_connection(conn))
    }

    /// Fresh in-memory database, used by tests and demos.
    pub fn in_memory() -> Result<Self, CoreError> {
        Ok(Self::with_connection(db::open_memory_database()?))
    }

    pub fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            started_at: Instant::now(),
        }
    }

    /// Lock the shared connection.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn.lock().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
