//! Delimited text files.

use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Delimiter and header handling for CSV/TSV files.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Name columns by the first row after reading.
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

impl Sheet {
    /// Read a delimited file. The sheet takes the file stem as its name.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened and a CSV error
    /// for malformed input.
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut sheet = Self::from_csv_reader(BufReader::new(file), options)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            sheet.rename(stem);
        }
        Ok(sheet)
    }

    /// Read delimited text, inferring each field with [`CellValue::parse`].
    /// Short rows are padded with `Null` to the widest row.
    ///
    /// # Errors
    ///
    /// See [`Sheet::from_csv_with_options`].
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(CellValue::parse).collect::<Vec<_>>());
        }

        let mut sheet = Self::from_data(rows);
        let width = sheet.col_count();
        for row in sheet.data_mut() {
            row.resize(width, CellValue::Null);
        }
        if options.has_headers && !sheet.is_empty() {
            sheet.name_columns_by_row(0)?;
        }
        Ok(sheet)
    }

    /// Write every row, header included, as delimited text.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer fails.
    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .from_writer(writer);
        for row in self.rows() {
            writer.write_record(row.iter().map(CellValue::as_str))?;
        }
        writer.flush()?;
        Ok(())
    }
}
