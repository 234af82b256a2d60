//! sqlgen - ask a local student database questions in plain English.
//!
//! A question is paired with fixed instructions describing the `STUDENT`
//! table, sent to Gemini, and whatever statement comes back is run verbatim
//! against the SQLite file. Results are shown on a small web page or printed
//! by the CLI.
//!
//! Pieces:
//! - `llm`: prompt composition and the Gemini client
//! - `query`: scoped SQLite execution and demo database seeding
//! - `assistant`: the question → SQL → rows pipeline
//! - `server`: axum page and JSON API
//! - `config`: environment/CLI configuration

pub mod assistant;
pub mod config;
pub mod llm;
pub mod query;
pub mod server;
pub mod types;

pub use assistant::{Answer, Assistant};
pub use config::Config;
pub use llm::{compose, GeminiClient, MissingCredential, Prompt, SqlGenerator};
pub use query::{Fetch, QueryExecutor};
pub use types::{Cell, ErrorKind, ResultSet, Result, Row, SqlGenError};
