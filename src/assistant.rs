//! Question → SQL → rows, one submission at a time.

use crate::llm::{compose, SqlGenerator};
use crate::query::{Fetch, QueryExecutor};
use crate::types::{Result, SqlGenError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// One completed submission.
#[derive(Debug, Serialize)]
pub struct Answer {
    /// Request id, also recorded on the tracing span
    pub id: Uuid,

    /// Question as submitted
    pub question: String,

    /// Statement returned by the model, verbatim
    pub sql: String,

    /// Rows, or empty plus the execution error
    pub fetch: Fetch,

    /// When the statement finished
    pub executed_at: DateTime<Utc>,

    /// Model call plus execution (ms)
    pub elapsed_ms: u64,
}

/// Ties the model client to the database executor.
pub struct Assistant<G: ?Sized> {
    generator: Arc<G>,
    executor: QueryExecutor,
}

impl<G: ?Sized> Clone for Assistant<G> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            executor: self.executor.clone(),
        }
    }
}

impl<G: SqlGenerator + ?Sized> Assistant<G> {
    pub fn new(generator: Arc<G>, executor: QueryExecutor) -> Self {
        Self { generator, executor }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Run one question through the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns the generator's error (credential or transport kind). Database
    /// failures do not error here; they come back inside [`Answer::fetch`].
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("ask", request_id = %id);

        async move {
            let start = Instant::now();
            let prompt = compose(question);

            tracing::info!(question = %question, "Generating SQL");
            let sql = self.generator.generate(&prompt).await.map_err(|e| {
                tracing::error!(error = %e, kind = %e.kind(), "SQL generation failed");
                e
            })?;

            let fetch = self.run(sql.clone()).await;

            Ok(Answer {
                id,
                question: question.to_string(),
                sql,
                fetch,
                executed_at: Utc::now(),
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
        .instrument(span)
        .await
    }

    /// Execute a statement on a blocking thread.
    pub async fn run(&self, sql: String) -> Fetch {
        let executor = self.executor.clone();
        match tokio::task::spawn_blocking(move || executor.read_sql_query(&sql)).await {
            Ok(fetch) => fetch,
            Err(e) => Fetch {
                error: Some(SqlGenError::Aborted(e.to_string())),
                ..Fetch::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Prompt;
    use crate::types::{Cell, ErrorKind};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Returns a canned statement and remembers what it was asked.
    struct CannedGenerator {
        sql: String,
        seen: Mutex<Vec<Prompt>>,
    }

    impl CannedGenerator {
        fn new(sql: &str) -> Self {
            Self {
                sql: sql.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SqlGenerator for CannedGenerator {
        async fn generate(&self, prompt: &Prompt) -> Result<String> {
            self.seen.lock().unwrap().push(prompt.clone());
            Ok(self.sql.clone())
        }
    }

    struct DownGenerator;

    #[async_trait]
    impl SqlGenerator for DownGenerator {
        async fn generate(&self, _prompt: &Prompt) -> Result<String> {
            Err(SqlGenError::transport("Gemini API error 503 Service Unavailable"))
        }
    }

    fn seeded_executor(dir: &std::path::Path) -> QueryExecutor {
        let path = dir.join("student.db");
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE STUDENT (NAME TEXT, CLASS TEXT, SECTION TEXT);
             INSERT INTO STUDENT VALUES ('Alice', 'Data Science', 'A'), ('Bob', 'ML', 'B');",
        )
        .unwrap();
        QueryExecutor::new(path)
    }

    #[tokio::test]
    async fn test_ask_runs_generated_sql() {
        let dir = tempdir().unwrap();
        let generator = Arc::new(CannedGenerator::new("SELECT COUNT(*) FROM STUDENT;"));
        let assistant = Assistant::new(generator.clone(), seeded_executor(dir.path()));

        let answer = assistant.ask("How many entries of records are present?").await.unwrap();
        assert_eq!(answer.sql, "SELECT COUNT(*) FROM STUDENT;");
        assert_eq!(answer.fetch.result.rows, vec![vec![Cell::Integer(2)]]);
        assert!(answer.fetch.error.is_none());

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].question, "How many entries of records are present?");
        assert_eq!(assistant.executor().open_connections(), 0);
    }

    #[tokio::test]
    async fn test_ask_bad_sql_returns_empty_answer() {
        let dir = tempdir().unwrap();
        let generator = Arc::new(CannedGenerator::new("```sql\nSELECT * FROM STUDENT;\n```"));
        let assistant = Assistant::new(generator, seeded_executor(dir.path()));

        let answer = assistant.ask("everyone").await.unwrap();
        assert!(answer.fetch.is_empty());
        assert_eq!(answer.fetch.error.map(|e| e.kind()), Some(ErrorKind::Execution));
        assert_eq!(assistant.executor().open_connections(), 0);
    }

    #[tokio::test]
    async fn test_ask_propagates_generator_failure() {
        let dir = tempdir().unwrap();
        let assistant = Assistant::new(Arc::new(DownGenerator), seeded_executor(dir.path()));

        let err = assistant.ask("anything").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_dyn_generator() {
        let dir = tempdir().unwrap();
        let generator: Arc<dyn SqlGenerator> = Arc::new(CannedGenerator::new("SELECT NAME FROM STUDENT WHERE SECTION = 'B'"));
        let assistant = Assistant::new(generator, seeded_executor(dir.path()));

        let answer = assistant.ask("who is in section B").await.unwrap();
        assert_eq!(answer.fetch.result.rows, vec![vec![Cell::Text("Bob".into())]]);
    }
}
