//! Derived tables ready for display and export.

use serde::Serialize;
use tripdash_sheet::{CellValue, Sheet};

use crate::birthdays::Birthday;
use crate::config::ColumnNames;
use crate::destinations::DestinationCount;
use crate::error::{DashResult, DashboardError};
use crate::ranking::ClientRanking;
use crate::roster::ClientRecord;

/// Sheet name used for exported tables.
pub const EXPORT_SHEET: &str = "dados";

/// A header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to a sheet named [`EXPORT_SHEET`] with the headers as row 0.
    ///
    /// # Errors
    ///
    /// Returns an error when a row width differs from the header width.
    pub fn to_sheet(&self) -> DashResult<Sheet> {
        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        Sheet::from_table(EXPORT_SHEET, &headers, self.rows.clone()).map_err(DashboardError::Export)
    }
}

fn count_cell(count: usize) -> CellValue {
    CellValue::Int(i64::try_from(count).unwrap_or(i64::MAX))
}

/// `Destino` / `Contagem`.
#[must_use]
pub fn popularity_table(counts: &[DestinationCount]) -> DataTable {
    let mut table = DataTable::new(["Destino", "Contagem"]);
    for entry in counts {
        table.push_row(vec![entry.destination.as_str().into(), count_cell(entry.count)]);
    }
    table
}

/// `Cliente` / `Quantidade de Destinos`.
#[must_use]
pub fn ranking_table(ranking: &[ClientRanking]) -> DataTable {
    let mut table = DataTable::new(["Cliente", "Quantidade de Destinos"]);
    for entry in ranking {
        table.push_row(vec![entry.client.as_str().into(), count_cell(entry.destinations)]);
    }
    table
}

/// Name, profession and phone of each retiree.
#[must_use]
pub fn retiree_display_table(retirees: &[&ClientRecord], columns: &ColumnNames) -> DataTable {
    let mut table = DataTable::new([&columns.name, &columns.profession, &columns.phone].map(String::as_str));
    for r in retirees {
        table.push_row(vec![
            r.name.as_str().into(),
            r.profession.as_str().into(),
            r.phone.as_str().into(),
        ]);
    }
    table
}

/// Full retiree records, trips included.
#[must_use]
pub fn retiree_export_table(retirees: &[&ClientRecord], columns: &ColumnNames) -> DataTable {
    let mut table = DataTable::new(
        [&columns.name, &columns.profession, &columns.phone, &columns.trips].map(String::as_str),
    );
    for r in retirees {
        table.push_row(vec![
            r.name.as_str().into(),
            r.profession.as_str().into(),
            r.phone.as_str().into(),
            r.trips.as_deref().into(),
        ]);
    }
    table
}

/// `Nome` / `Dia` / `Data Formatada` / `Celular`.
#[must_use]
pub fn birthday_table(birthdays: &[Birthday]) -> DataTable {
    let mut table = DataTable::new(["Nome", "Dia", "Data Formatada", "Celular"]);
    for b in birthdays {
        table.push_row(vec![
            b.name.as_str().into(),
            CellValue::Int(i64::from(b.day)),
            b.formatted_date.as_str().into(),
            b.phone.as_str().into(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popularity_table() {
        let table = popularity_table(&[DestinationCount::new("Paris", 2), DestinationCount::new("Rome", 1)]);
        assert_eq!(table.headers, vec!["Destino", "Contagem"]);
        assert_eq!(table.rows[0], vec![CellValue::from("Paris"), CellValue::Int(2)]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_retiree_tables() {
        let ana = ClientRecord::new("Ana", "Aposentada", "111", Some("paris"));
        let columns = ColumnNames::default();

        let display = retiree_display_table(&[&ana], &columns);
        assert_eq!(display.headers, vec!["Nome", "Profissão", "Celular"]);

        let export = retiree_export_table(&[&ana], &columns);
        assert_eq!(export.headers, vec!["Nome", "Profissão", "Celular", "Viagens"]);
        assert_eq!(export.rows[0][3], CellValue::from("paris"));
    }

    #[test]
    fn test_to_sheet() {
        let sheet = birthday_table(&[]).to_sheet().unwrap();
        assert_eq!(sheet.name(), "dados");
        assert_eq!(sheet.row_count(), 1);
        assert!(sheet.has_column("Data Formatada"));

        let mut bad = DataTable::new(["a", "b"]);
        bad.push_row(vec![CellValue::Null]);
        assert!(matches!(bad.to_sheet(), Err(DashboardError::Export(_))));
    }
}
