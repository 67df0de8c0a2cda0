//! Error types for tripdash.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tripdash_parser::LiteralError;
use tripdash_sheet::SheetError;

/// Result type for dashboard operations.
pub type DashResult<T> = Result<T, DashboardError>;

/// The input files the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Roster,
    Birthdays,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Roster => write!(f, "roster"),
            InputKind::Birthdays => write!(f, "birthday table"),
        }
    }
}

/// Errors that stop a render.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A required input path was not supplied.
    #[error("No {0} file was provided")]
    MissingInput(InputKind),

    /// The file could not be read or is not a valid spreadsheet.
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: SheetError,
    },

    /// The spreadsheet lacks a column the dashboard needs.
    #[error("The {table} has no '{column}' column")]
    MissingColumn { table: InputKind, column: String },

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file is not valid YAML.
    #[error("Configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing an export failed.
    #[error("Export error: {0}")]
    Export(#[source] SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Whether this error comes from reading an input spreadsheet.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DashboardError::Load { .. } | DashboardError::MissingColumn { .. }
        )
    }
}

/// Errors decoding a month's birthday list. These only affect the birthday
/// panel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BirthdayError {
    /// The serialized list is not valid literal syntax.
    #[error("{0}")]
    Parse(#[from] LiteralError),

    /// The literal parsed but is not a list of records.
    #[error("Expected a list of records: {0}")]
    Shape(String),
}
