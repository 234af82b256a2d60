//! Statement execution against the local student database.

pub mod executor;
pub mod seed;

pub use executor::{Fetch, QueryExecutor, ScopedConnection};
pub use seed::{init_student_db, SAMPLE_STUDENTS};
