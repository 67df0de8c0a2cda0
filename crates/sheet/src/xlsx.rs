//! Excel workbooks: read with calamine, written with rust_xlsxwriter.

use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, Worksheet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Which worksheet to read and whether its first row is a header.
#[derive(Debug, Clone, Default)]
pub struct XlsxReadOptions {
    pub has_headers: bool,
    /// First worksheet when unset.
    pub sheet_name: Option<String>,
}

impl XlsxReadOptions {
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    #[must_use]
    pub fn with_sheet(mut self, sheet_name: Option<String>) -> Self {
        self.sheet_name = sheet_name;
        self
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Null,
            Data::Bool(b) => Self::Bool(*b),
            Data::Int(i) => Self::Int(*i),
            Data::Float(f) => Self::Float(*f),
            // Serial day number; callers decide whether it is a date.
            Data::DateTime(dt) => Self::Float(dt.as_f64()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Error(e) => Self::Text(format!("#{e:?}")),
        }
    }
}

fn read_worksheet<RS: Read + Seek>(workbook: &mut Xlsx<RS>, options: &XlsxReadOptions) -> Result<Sheet> {
    let names = workbook.sheet_names();
    let name = match &options.sheet_name {
        Some(wanted) if names.contains(wanted) => wanted.clone(),
        Some(wanted) => return Err(SheetError::SheetNotFound(wanted.clone())),
        None => match names.first() {
            Some(first) => first.clone(),
            None => return Ok(Sheet::new()),
        },
    };

    let range = workbook.worksheet_range(&name)?;
    let mut sheet = Sheet::with_name(name);
    sheet
        .data_mut()
        .extend(range.rows().map(|row| row.iter().map(CellValue::from).collect()));

    if options.has_headers && !sheet.is_empty() {
        sheet.name_columns_by_row(0)?;
    }
    Ok(sheet)
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        // Excel numbers are f64 either way.
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

impl Sheet {
    /// # Errors
    ///
    /// Returns an error when the file is not a readable workbook or the named
    /// worksheet is missing.
    pub fn from_xlsx_with_options<P: AsRef<Path>>(path: P, options: &XlsxReadOptions) -> Result<Self> {
        let mut workbook: Xlsx<BufReader<File>> = open_workbook(path.as_ref())?;
        read_worksheet(&mut workbook, options)
    }

    /// In-memory variant of [`Sheet::from_xlsx_with_options`].
    ///
    /// # Errors
    ///
    /// See [`Sheet::from_xlsx_with_options`].
    pub fn from_xlsx_bytes(bytes: &[u8], options: &XlsxReadOptions) -> Result<Self> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;
        read_worksheet(&mut workbook, options)
    }

    /// # Errors
    ///
    /// Returns an error when a cell or the file cannot be written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_workbook()?.save(path.as_ref())?;
        Ok(())
    }

    /// Single-worksheet workbook named after the sheet. The document
    /// timestamp is pinned, so equal sheets give equal bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when a cell cannot be written.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_workbook()?.save_to_buffer()?)
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.name())?;
        for (r, row) in self.rows().iter().enumerate() {
            let r = u32::try_from(r).map_err(|_| SheetError::Workbook(format!("row {r} is past the sheet limit")))?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c)
                    .map_err(|_| SheetError::Workbook(format!("column {c} is past the sheet limit")))?;
                write_cell(worksheet, r, c, cell)?;
            }
        }
        Ok(workbook)
    }
}
