//! The client roster.

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;
use tripdash_sheet::{CellValue, Sheet, SheetError};

use crate::config::ColumnNames;
use crate::error::{DashResult, DashboardError, InputKind};

/// One roster row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    pub name: String,
    pub profession: String,
    pub phone: String,
    /// Raw comma-separated destinations, `None` when the cell is empty.
    pub trips: Option<String>,
}

impl ClientRecord {
    pub fn new(
        name: impl Into<String>,
        profession: impl Into<String>,
        phone: impl Into<String>,
        trips: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            profession: profession.into(),
            phone: phone.into(),
            trips: trips.map(str::to_string),
        }
    }
}

/// Column positions of the four roster fields.
struct RosterColumns {
    name: usize,
    profession: usize,
    phone: usize,
    trips: usize,
}

impl RosterColumns {
    fn locate(sheet: &Sheet, columns: &ColumnNames) -> DashResult<Self> {
        let find = |column: &str| {
            sheet
                .column_index_by_name(column)
                .map_err(|_| DashboardError::MissingColumn {
                    table: InputKind::Roster,
                    column: column.to_string(),
                })
        };
        Ok(Self {
            name: find(&columns.name)?,
            profession: find(&columns.profession)?,
            phone: find(&columns.phone)?,
            trips: find(&columns.trips)?,
        })
    }
}

fn cell_text(row: &[CellValue], col: usize) -> String {
    row.get(col).map(CellValue::as_str).unwrap_or_default()
}

/// Client records in spreadsheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    records: Vec<ClientRecord>,
}

impl Roster {
    #[must_use]
    pub fn new(records: Vec<ClientRecord>) -> Self {
        Self { records }
    }

    /// Read the roster from a sheet whose first row holds the headers.
    ///
    /// Rows where every roster field is empty are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingColumn`] when a configured column is
    /// absent.
    pub fn from_sheet(sheet: &Sheet, columns: &ColumnNames) -> DashResult<Self> {
        let sheet = named(sheet, InputKind::Roster)?;
        let cols = RosterColumns::locate(&sheet, columns)?;

        let records: Vec<ClientRecord> = sheet
            .data_rows()
            .map(|row| ClientRecord {
                name: cell_text(row, cols.name),
                profession: cell_text(row, cols.profession),
                phone: cell_text(row, cols.phone),
                trips: row.get(cols.trips).and_then(CellValue::as_text),
            })
            .filter(|record| {
                !(record.name.is_empty()
                    && record.profession.is_empty()
                    && record.phone.is_empty()
                    && record.trips.is_none())
            })
            .collect();

        debug!(records = records.len(), sheet = sheet.name(), "Loaded roster");
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The raw trips field of every record.
    pub fn trips(&self) -> impl Iterator<Item = Option<&str>> {
        self.records.iter().map(|r| r.trips.as_deref())
    }

    /// Phone number of the first record named exactly `name`. A blank name
    /// never matches.
    #[must_use]
    pub fn phone_for(&self, name: &str) -> Option<&str> {
        if name.trim().is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.phone.as_str())
    }
}

/// Borrow the sheet when its columns are named, otherwise name them by the
/// first row.
pub(crate) fn named(sheet: &Sheet, table: InputKind) -> DashResult<Cow<'_, Sheet>> {
    if sheet.column_names().is_some() {
        return Ok(Cow::Borrowed(sheet));
    }
    let mut owned = sheet.clone();
    owned.name_columns_by_row(0).map_err(|e| match e {
        SheetError::MissingRow { .. } => DashboardError::MissingColumn {
            table,
            column: "header row".to_string(),
        },
        other => DashboardError::Load {
            path: sheet.name().into(),
            source: other,
        },
    })?;
    Ok(Cow::Owned(owned))
}
