//! Rows returned by one statement.

use rusqlite::types::ValueRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single SQLite value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    /// Copy a borrowed SQLite value out of the statement.
    pub fn from_value_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(n) => Cell::Integer(n),
            ValueRef::Real(f) => Cell::Real(f),
            ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Cell::Blob(bytes.to_vec()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Real(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Blob(b) => write!(f, "[BLOB {} bytes]", b.len()),
        }
    }
}

/// One result tuple, in column order.
pub type Row = Vec<Cell>;

/// Ordered rows plus the column names that label them.
///
/// Empty when the statement returned nothing or failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Column names in statement order
    pub columns: Vec<String>,

    /// Rows in the order SQLite produced them
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a plain-text table for terminal output.
    pub fn to_text_table(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        for row in &rendered {
            for (i, value) in row.iter().enumerate() {
                let len = value.chars().count();
                match widths.get_mut(i) {
                    Some(w) if *w < len => *w = len,
                    Some(_) => {}
                    None => widths.push(len),
                }
            }
        }

        let line = |values: &[String]| -> String {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:<width$}", v, width = widths[i]))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        if !self.columns.is_empty() {
            out.push_str(&line(&self.columns));
            out.push('\n');
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
        for row in &rendered {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}
