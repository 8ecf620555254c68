//! Error types for table construction and loading.

use thiserror::Error;

pub type InterpResult<T> = Result<T, InterpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    #[error("Table '{what}' is empty")]
    Empty { what: String },

    #[error("Table '{what}' length mismatch: {x_len} x values vs {y_len} y values")]
    LengthMismatch {
        what: String,
        x_len: usize,
        y_len: usize,
    },

    #[error("Table '{what}' is not strictly increasing at index {index}")]
    NotMonotonic { what: String, index: usize },

    #[error("Output length {out_len} does not match query length {query_len}")]
    OutputLength { query_len: usize, out_len: usize },

    #[error("Failed to load airfoil '{path}': {reason}")]
    Load { path: String, reason: String },

    #[error("Unknown airfoil format '{name}'")]
    UnknownFormat { name: String },
}
