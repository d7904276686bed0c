//! Persistence gateway for promptbase.
//!
//! Provides a `Gateway` that owns the single SQLite connection, creates the
//! `prompts` table on startup, and hands out the [`Prompts`] store that runs
//! every data-access statement.
//!
//! Lifecycle: [`Gateway::initialize`] → use → [`Gateway::close`].

mod error;
mod prompts;

pub use error::{GatewayError, Result};
pub use prompts::{Prompt, Prompts, SortOrder, TIMESTAMP_FORMAT};

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Memory,
    File(PathBuf),
}

impl ConnectionTarget {
    /// Parse a connection string.
    ///
    /// Accepted forms: `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>`, or a bare filesystem path.
    pub fn parse(connection_string: &str) -> Result<Self> {
        let s = connection_string.trim();
        if s.is_empty() {
            return Err(GatewayError::Connection(
                "no connection string configured (set DATABASE_URL)".to_string(),
            ));
        }

        if s == ":memory:" || s == "sqlite::memory:" {
            return Ok(Self::Memory);
        }

        if let Some(rest) = s.strip_prefix("sqlite:") {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            if path.is_empty() {
                return Err(GatewayError::Connection(format!(
                    "connection string '{}' names no database file",
                    s
                )));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }

        if let Some((scheme, _)) = s.split_once("://") {
            return Err(GatewayError::Connection(format!(
                "unsupported store '{}': only sqlite connection strings are accepted",
                scheme
            )));
        }

        Ok(Self::File(PathBuf::from(s)))
    }
}

/// Owns the SQLite connection shared by every operation.
pub struct Gateway {
    conn: Mutex<Connection>,
    target: ConnectionTarget,
}

impl Gateway {
    /// Open the store named by `connection_string` and make sure the
    /// `prompts` table exists.
    ///
    /// Any failure here is a [`GatewayError::Connection`]; the application
    /// cannot proceed without a store.
    pub fn initialize(connection_string: &str) -> Result<Self> {
        let target = ConnectionTarget::parse(connection_string)?;

        let conn = match &target {
            ConnectionTarget::Memory => Connection::open_in_memory(),
            ConnectionTarget::File(path) => Self::open_file(path),
        }
        .map_err(|e| GatewayError::Connection(format!("{}: {}", describe(&target), e)))?;

        Self::register_functions(&conn)
            .and_then(|_| Self::init_schema(&conn))
            .map_err(|e| GatewayError::Connection(format!("{}: {}", describe(&target), e)))?;

        info!(store = %describe(&target), "prompt store ready");

        Ok(Self {
            conn: Mutex::new(conn),
            target,
        })
    }

    /// Open an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize("sqlite::memory:")
    }

    /// The store this gateway is connected to.
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Access the prompts store.
    pub fn prompts(&self) -> Result<Prompts<'_>> {
        let conn = self.lock()?;
        Ok(Prompts::new(conn))
    }

    /// Close the connection, ending the gateway's lifecycle.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| GatewayError::LockPoisoned)?;
        conn.close().map_err(|(_, e)| GatewayError::Database(e))?;
        debug!(store = %describe(&self.target), "prompt store closed");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| GatewayError::LockPoisoned)
    }

    fn open_file(path: &Path) -> rusqlite::Result<Connection> {
        // No SQLITE_OPEN_URI: the path is taken literally.
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// `casefold(text)`: Unicode lowercase, so searches ignore case beyond
    /// ASCII.
    fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
        conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: String = ctx.get(0)?;
                Ok(text.to_lowercase())
            },
        )
    }

    /// Initialize the database schema.
    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS prompts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (length(trim(title)) > 0),
                prompt TEXT NOT NULL CHECK (length(trim(prompt)) > 0),
                is_favorite BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_prompts_created_at ON prompts(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_prompts_favorite ON prompts(is_favorite DESC, created_at DESC);
            "#,
        )
    }
}

fn describe(target: &ConnectionTarget) -> String {
    match target {
        ConnectionTarget::Memory => "in-memory database".to_string(),
        ConnectionTarget::File(path) => path.display().to_string(),
    }
}
