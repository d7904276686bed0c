//! Prompts store: every statement that touches the `prompts` table.
//!
//! All values are bound as parameters. The only text spliced into SQL is the
//! `ORDER BY` fragment, which comes from [`SortOrder::sql`] and never from the
//! caller.

use std::fmt;
use std::str::FromStr;
use std::sync::MutexGuard;

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text layout of `created_at` / `updated_at` as SQLite stores them.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const COLUMNS: &str = "id, title, prompt, is_favorite, created_at, updated_at";

/// A stored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    pub prompt: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The three fixed list orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    FavoritesFirst,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [Self::Newest, Self::Oldest, Self::FavoritesFirst];

    /// `ORDER BY` fragment. Ties on `created_at` fall back to `id` so rows
    /// inserted within the same millisecond keep insertion order.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC, id DESC",
            Self::Oldest => "created_at ASC, id ASC",
            Self::FavoritesFirst => "is_favorite DESC, created_at DESC, id DESC",
        }
    }

    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::FavoritesFirst => "Favorites First",
        }
    }

    /// Identifier used in query strings.
    pub fn value(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::FavoritesFirst => "favorites-first",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "favorites first" | "favorites-first" | "favorites_first" => Ok(Self::FavoritesFirst),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Prompts store with a borrowed connection.
pub struct Prompts<'db> {
    conn: MutexGuard<'db, Connection>,
}

impl<'db> Prompts<'db> {
    pub(crate) fn new(conn: MutexGuard<'db, Connection>) -> Self {
        Self { conn }
    }

    /// Insert a new prompt and return the id the store assigned.
    ///
    /// Callers validate that `title` and `prompt` are non-empty; the table's
    /// CHECK constraints reject them otherwise.
    pub fn insert(&self, title: &str, prompt: &str, is_favorite: bool) -> crate::Result<i64> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO prompts (title, prompt, is_favorite) VALUES (?1, ?2, ?3) RETURNING id",
            params![title, prompt, is_favorite],
            |row| row.get(0),
        )?;

        debug!(id, is_favorite, "inserted prompt");
        Ok(id)
    }

    /// Overwrite the mutable fields of a prompt and refresh `updated_at`.
    ///
    /// Returns `false` when no row has this id.
    pub fn update(
        &self,
        id: i64,
        title: &str,
        prompt: &str,
        is_favorite: bool,
    ) -> crate::Result<bool> {
        let affected = self.conn.execute(
            r#"
            UPDATE prompts
            SET title = ?1,
                prompt = ?2,
                is_favorite = ?3,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ?4
            "#,
            params![title, prompt, is_favorite, id],
        )?;

        debug!(id, affected, "updated prompt");
        Ok(affected > 0)
    }

    /// Delete a prompt by id. Returns `false` when nothing was deleted.
    pub fn delete(&self, id: i64) -> crate::Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])?;

        debug!(id, affected, "deleted prompt");
        Ok(affected > 0)
    }

    /// Flip `is_favorite` in place with a single statement.
    pub fn toggle_favorite(&self, id: i64) -> crate::Result<bool> {
        let affected = self.conn.execute(
            r#"
            UPDATE prompts
            SET is_favorite = NOT is_favorite,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ?1
            "#,
            params![id],
        )?;

        debug!(id, affected, "toggled favorite");
        Ok(affected > 0)
    }

    /// Prompts whose title or body contains `query`, ignoring case.
    ///
    /// The query is matched literally, with no wildcards. An empty query
    /// matches every prompt.
    pub fn search(&self, query: &str, order: SortOrder) -> crate::Result<Vec<Prompt>> {
        let sql = format!(
            r#"SELECT {} FROM prompts
              WHERE ?1 = ''
                 OR instr(casefold(title), casefold(?1)) > 0
                 OR instr(casefold(prompt), casefold(?1)) > 0
              ORDER BY {}"#,
            COLUMNS,
            order.sql()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![query], Self::row_to_prompt)?;

        let mut prompts = Vec::new();
        for row in rows {
            prompts.push(row?);
        }

        debug!(query, order = order.value(), matched = prompts.len(), "searched prompts");
        Ok(prompts)
    }

    /// Get a prompt by id.
    pub fn fetch_one(&self, id: i64) -> crate::Result<Option<Prompt>> {
        let prompt = self
            .conn
            .query_row(
                &format!("SELECT {} FROM prompts WHERE id = ?1", COLUMNS),
                params![id],
                Self::row_to_prompt,
            )
            .optional()?;

        Ok(prompt)
    }

    /// Number of stored prompts.
    pub fn count(&self) -> crate::Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prompts", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn row_to_prompt(row: &rusqlite::Row) -> Result<Prompt, rusqlite::Error> {
        Ok(Prompt {
            id: row.get(0)?,
            title: row.get(1)?,
            prompt: row.get(2)?,
            is_favorite: row.get(3)?,
            created_at: parse_timestamp(row, 4)?,
            updated_at: parse_timestamp(row, 5)?,
        })
    }
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
