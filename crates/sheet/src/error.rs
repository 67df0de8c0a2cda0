use thiserror::Error;

/// Failure reading, naming or writing a sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("sheet has no row {index} ({rows} rows)")]
    MissingRow { index: usize, rows: usize },

    #[error("columns are not named; no header row was read")]
    Unnamed,

    #[error("no column named '{0}'")]
    ColumnNotFound(String),

    #[error("row has {actual} cells, header has {expected}")]
    RaggedRow { expected: usize, actual: usize },

    #[error("workbook has no sheet named '{0}'")]
    SheetNotFound(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<calamine::XlsxError> for SheetError {
    fn from(e: calamine::XlsxError) -> Self {
        Self::Workbook(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
