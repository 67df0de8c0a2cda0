use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::HashMap;

/// A named grid of cells, stored row by row.
///
/// Naming columns from a header row keeps that row in the grid; the rows
/// after it are the data rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    header: Option<Header>,
}

#[derive(Debug, Clone)]
struct Header {
    row: usize,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Trimmed header names. Blank names (the unused tail of a spreadsheet
    /// range) hold their position but cannot be looked up. A repeated name
    /// resolves to its first column.
    fn read(row: usize, cells: &[CellValue]) -> Self {
        let names: Vec<String> = cells.iter().map(|c| c.as_str().trim().to_string()).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (col, name) in names.iter().enumerate().filter(|(_, n)| !n.is_empty()) {
            index.entry(name.clone()).or_insert(col);
        }
        Self { row, names, index }
    }
}

impl Sheet {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            header: None,
        }
    }

    /// Unnamed sheet over raw rows, columns not named.
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        let mut sheet = Self::new();
        sheet.rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        sheet
    }

    /// Header row plus data rows, columns named by the header.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::RaggedRow`] when a row is not as wide as the
    /// header.
    pub fn from_table(name: &str, headers: &[&str], rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|row| row.len() != headers.len()) {
            return Err(SheetError::RaggedRow {
                expected: headers.len(),
                actual: row.len(),
            });
        }
        let mut sheet = Self::with_name(name);
        sheet.rows.push(headers.iter().map(|h| CellValue::from(*h)).collect());
        sheet.rows.extend(rows);
        sheet.name_columns_by_row(0)?;
        Ok(sheet)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row, header included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.rows
    }

    /// Rows after the header row; every row when columns are not named.
    pub fn data_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        let skip = self.header.as_ref().map_or(0, |h| h.row + 1);
        self.rows.iter().skip(skip).map(Vec::as_slice)
    }

    /// Name the columns after the cells of row `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::MissingRow`] when the sheet is shorter than
    /// `index`.
    pub fn name_columns_by_row(&mut self, index: usize) -> Result<()> {
        let cells = self.rows.get(index).ok_or(SheetError::MissingRow {
            index,
            rows: self.rows.len(),
        })?;
        self.header = Some(Header::read(index, cells));
        Ok(())
    }

    #[must_use]
    pub fn column_names(&self) -> Option<&[String]> {
        self.header.as_ref().map(|h| h.names.as_slice())
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.header.as_ref().is_some_and(|h| h.index.contains_key(name))
    }

    /// # Errors
    ///
    /// Returns [`SheetError::Unnamed`] before a header row is read and
    /// [`SheetError::ColumnNotFound`] for an unknown name.
    pub fn column_index_by_name(&self, name: &str) -> Result<usize> {
        let header = self.header.as_ref().ok_or(SheetError::Unnamed)?;
        header
            .index
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound(name.to_string()))
    }

    /// Values of a named column below the header. Short rows read as `Null`.
    ///
    /// # Errors
    ///
    /// Same as [`Sheet::column_index_by_name`].
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        let col = self.column_index_by_name(name)?;
        Ok(self
            .data_rows()
            .map(|row| row.get(col).cloned().unwrap_or_default())
            .collect())
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
