//! Spreadsheet I/O for tripdash.
//!
//! A [`Sheet`] is a named grid of [`CellValue`]s. Workbooks are read with
//! calamine and written with rust_xlsxwriter; delimited files go through the
//! csv crate. Columns are addressed by name once a header row is read.
//!
//! ```
//! use tripdash_sheet::{CellValue, Sheet, XlsxReadOptions};
//!
//! let roster = Sheet::from_data(vec![
//!     vec!["Nome", "Celular", "Viagens"],
//!     vec!["Ana", "11999990000", "Paris, Roma"],
//! ]);
//!
//! let bytes = roster.to_xlsx_bytes().unwrap();
//! let back = Sheet::from_xlsx_bytes(&bytes, &XlsxReadOptions::default().with_headers(true)).unwrap();
//! assert_eq!(back.column_by_name("Viagens").unwrap(), vec![CellValue::from("Paris, Roma")]);
//! ```

mod cell;
mod csv;
mod error;
mod sheet;
mod xlsx;

pub use cell::CellValue;
pub use csv::CsvOptions;
pub use error::{Result, SheetError};
pub use sheet::Sheet;
pub use xlsx::XlsxReadOptions;
