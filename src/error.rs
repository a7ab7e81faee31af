//! Error type shared by the loaders, the remapper and the renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DdgError>;

/// Everything that can stop a run.
///
/// Residues without a counterpart in the structure are not errors; they end
/// up as null values in the `orn` column.
#[derive(Debug, Error)]
pub enum DdgError {
    /// The input table lacks one or more required columns.
    #[error("Table must contain columns: {required:?}, but found: {found:?}")]
    MissingColumns {
        /// Columns the operation needs
        required: Vec<String>,
        /// Columns present after lowercasing
        found: Vec<String>,
    },

    /// A region token did not match `Name:start-end`.
    #[error("Bad region format: '{0}'. Use Name:start-end")]
    InvalidRegion(String),

    /// The table delimiter could not be resolved from the file extension.
    #[error("Unsupported file format for {0}. Use a TSV or CSV file.")]
    UnsupportedFormat(PathBuf),

    /// No row belongs to the requested chain.
    #[error("No rows for chain '{chain}' in {path}")]
    EmptyChain {
        /// Requested chain identifier
        chain: String,
        /// Table that was searched
        path: PathBuf,
    },

    /// Every row was removed by the positional filters.
    #[error("No data remain after applying --start/--end filters.")]
    EmptyProfile,

    /// The structure file could not be parsed.
    #[error("Failed to read structure {path}: {message}")]
    Structure {
        /// Structure file
        path: PathBuf,
        /// Joined pdbtbx errors
        message: String,
    },

    /// Drawing the figure failed.
    #[error("Failed to render figure: {0}")]
    Render(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure while reading, reshaping or writing a table
    #[error("Table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
