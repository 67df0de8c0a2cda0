//! XLSX export of derived tables.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{DashResult, DashboardError};
use crate::table::DataTable;

/// Serialize a table as a single-sheet workbook.
///
/// The sheet is named `dados`, the first row holds the headers and there is
/// no index column. Identical tables give identical bytes.
///
/// # Errors
///
/// Returns [`DashboardError::Export`] if the workbook cannot be built.
pub fn export_xlsx(table: &DataTable) -> DashResult<Vec<u8>> {
    table.to_sheet()?.to_xlsx_bytes().map_err(DashboardError::Export)
}

/// Write a table to `path` as XLSX, returning the number of bytes written.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_export(table: &DataTable, path: &Path) -> DashResult<usize> {
    let bytes = export_xlsx(table)?;
    fs::write(path, &bytes).map_err(|e| DashboardError::Export(e.into()))?;
    info!(path = %path.display(), rows = table.len(), bytes = bytes.len(), "Exported table");
    Ok(bytes.len())
}
