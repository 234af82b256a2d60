//! Core data types.
//!
//! - `SqlGenError` / `ErrorKind`: error taxonomy for the pipeline
//! - `Cell`, `Row`, `ResultSet`: rows fetched for one statement
//! - `Result`: convenient result type alias

pub mod error;
pub mod rows;

pub use error::{ErrorKind, Result, SqlGenError};
pub use rows::{Cell, ResultSet, Row};
