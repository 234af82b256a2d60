//! Creates a demo `student.db` with the table the prompt describes.

use crate::query::executor::QueryExecutor;
use crate::types::{Result, SqlGenError};
use std::path::Path;

/// Sample records loaded by [`init_student_db`]: (NAME, CLASS, SECTION).
pub const SAMPLE_STUDENTS: &[(&str, &str, &str)] = &[
    ("Krish", "Data Science", "A"),
    ("Sudhanshu", "Data Science", "B"),
    ("Darius", "Data Science", "A"),
    ("Vikash", "DEVOPS", "A"),
    ("Dipesh", "DEVOPS", "A"),
];

const CREATE_TABLE: &str =
    "CREATE TABLE STUDENT (NAME VARCHAR(25), CLASS VARCHAR(25), SECTION VARCHAR(25))";

/// Create the `STUDENT` table at `path` and load [`SAMPLE_STUDENTS`].
///
/// # Arguments
///
/// * `path` - Database file to create
/// * `force` - Drop an existing `STUDENT` table first
///
/// # Returns
///
/// Number of rows inserted
///
/// # Errors
///
/// Returns `SqlGenError::Config` if the table exists and `force` is false,
/// `SqlGenError::Execution` for any SQLite failure
pub fn init_student_db(path: &Path, force: bool) -> Result<usize> {
    let executor = QueryExecutor::new(path);
    let mut conn = executor.connect()?;

    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'STUDENT')",
        [],
        |row| row.get(0),
    )?;

    if exists && !force {
        return Err(SqlGenError::config(format!(
            "STUDENT table already exists in {} (use --force to recreate)",
            path.display()
        )));
    }

    let tx = conn.transaction()?;
    tx.execute("DROP TABLE IF EXISTS STUDENT", [])?;
    tx.execute(CREATE_TABLE, [])?;
    {
        let mut insert = tx.prepare("INSERT INTO STUDENT (NAME, CLASS, SECTION) VALUES (?1, ?2, ?3)")?;
        for (name, class, section) in SAMPLE_STUDENTS {
            insert.execute([name, class, section])?;
        }
    }
    tx.commit()?;

    tracing::info!(path = %path.display(), rows = SAMPLE_STUDENTS.len(), "Seeded STUDENT table");
    Ok(SAMPLE_STUDENTS.len())
}
