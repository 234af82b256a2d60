//! Runs a generated statement against the local SQLite file.
//!
//! Every call opens its own connection and releases it before returning. The
//! statement text is executed verbatim: no parameters, no read-only check.
//! Exactly one statement per call; trailing statements are rejected.
//! A `DELETE` or `DROP` produced by the model takes full effect.

use crate::types::{Cell, Result, ResultSet, SqlGenError};
use rusqlite::{Batch, Connection};
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome of [`QueryExecutor::read_sql_query`].
///
/// `result` is empty whenever `error` is set.
#[derive(Debug, Default, Serialize)]
pub struct Fetch {
    pub result: ResultSet,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<SqlGenError>,
}

fn serialize_error<S>(error: &Option<SqlGenError>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl Fetch {
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

/// Connection that is counted while alive and closed on drop.
pub struct ScopedConnection {
    conn: Connection,
    open: Arc<AtomicUsize>,
}

impl ScopedConnection {
    /// Open `path`. Nothing is counted unless the open succeeds.
    fn open(path: &Path, open: Arc<AtomicUsize>) -> Result<Self> {
        let conn = Connection::open(path)?;
        open.fetch_add(1, Ordering::SeqCst);
        Ok(Self { conn, open })
    }
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for ScopedConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        // Connection closes when `conn` drops right after this
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Executes statements against one database file.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    db_path: PathBuf,
    open: Arc<AtomicUsize>,
}

impl QueryExecutor {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Connections currently held by this executor (and its clones).
    ///
    /// Zero between calls.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Acquire a counted connection to the database file.
    pub fn connect(&self) -> Result<ScopedConnection> {
        ScopedConnection::open(&self.db_path, Arc::clone(&self.open))
    }

    /// Execute `sql` and fetch every row.
    ///
    /// Text that is blank or only comments yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns `SqlGenError::Execution` if the file cannot be opened, the
    /// statement fails to prepare or step, or more than one statement is
    /// given (nothing runs in that case)
    pub fn execute(&self, sql: &str) -> Result<ResultSet> {
        let conn = self.connect()?;
        let mut batch = Batch::new(&conn, sql);
        let Some(mut stmt) = batch.next()? else {
            return Ok(ResultSet::default());
        };
        if batch.next()?.is_some() {
            return Err(rusqlite::Error::MultipleStatement.into());
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(Cell::from_value_ref(row.get_ref(i)?));
            }
            rows.push(cells);
        }

        Ok(ResultSet { columns, rows })
    }

    /// Execute `sql`, turning any database error into an empty result.
    ///
    /// Never fails. The error, if any, is logged and carried in
    /// [`Fetch::error`] for display.
    pub fn read_sql_query(&self, sql: &str) -> Fetch {
        match self.execute(sql) {
            Ok(result) => {
                tracing::info!(rows = result.row_count(), "Query executed");
                Fetch { result, error: None }
            }
            Err(e) => {
                tracing::warn!(error = %e, sql = %sql, "Query failed");
                Fetch {
                    result: ResultSet::default(),
                    error: Some(e),
                }
            }
        }
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_DB_PATH)
    }
}
