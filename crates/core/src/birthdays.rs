//! Monthly birthday lists joined against the roster.
//!
//! The birthday table has one row per month. Each row carries a serialized
//! list of `{name, birthday}` records, either as text in Python-literal or
//! JSON syntax or already structured.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};
use tripdash_parser::{parse_literal, Literal};
use tripdash_sheet::{CellValue, Sheet};

use crate::calendar::{format_day_month, parse_birthday};
use crate::config::{ColumnNames, ReportSettings};
use crate::error::{BirthdayError, DashResult, DashboardError, InputKind};
use crate::roster::{named, Roster};

/// A record from a month's list before date parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawBirthday {
    pub name: String,
    pub birthday: CellValue,
}

impl RawBirthday {
    pub fn new(name: impl Into<String>, birthday: impl Into<CellValue>) -> Self {
        Self {
            name: name.into(),
            birthday: birthday.into(),
        }
    }
}

/// A month's birthday list, structured or still serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum BirthdayList {
    Structured(Vec<RawBirthday>),
    Raw(String),
}

impl BirthdayList {
    /// Wrap a spreadsheet cell. Empty cells are an empty list.
    #[must_use]
    pub fn from_cell(cell: &CellValue) -> Self {
        match cell {
            CellValue::Null => BirthdayList::Structured(Vec::new()),
            CellValue::Text(s) => BirthdayList::Raw(s.clone()),
            other => BirthdayList::Raw(other.as_str()),
        }
    }

    /// Decode into records, parsing serialized text.
    ///
    /// # Errors
    ///
    /// Returns [`BirthdayError::Parse`] for malformed text and
    /// [`BirthdayError::Shape`] when the value is not a list of records.
    pub fn decode(&self, columns: &ColumnNames) -> Result<Vec<RawBirthday>, BirthdayError> {
        let text = match self {
            BirthdayList::Structured(records) => return Ok(records.clone()),
            BirthdayList::Raw(text) if text.trim().is_empty() => return Ok(Vec::new()),
            BirthdayList::Raw(text) => text,
        };

        let literal = parse_literal(text)?;
        let items = literal
            .as_list()
            .ok_or_else(|| BirthdayError::Shape(format!("found {}", literal_kind(&literal))))?;

        items
            .iter()
            .map(|item| {
                if item.as_dict().is_none() {
                    return Err(BirthdayError::Shape(format!(
                        "list item is {}",
                        literal_kind(item)
                    )));
                }
                let name = item
                    .get(&columns.entry_name)
                    .and_then(Literal::to_text)
                    .unwrap_or_default();
                let birthday = item
                    .get(&columns.entry_birthday)
                    .map(literal_to_cell)
                    .unwrap_or_default();
                Ok(RawBirthday { name, birthday })
            })
            .collect()
    }
}

fn literal_kind(literal: &Literal) -> &'static str {
    match literal {
        Literal::Null => "null",
        Literal::Bool(_) => "a boolean",
        Literal::Int(_) | Literal::Float(_) => "a number",
        Literal::String(_) => "a string",
        Literal::List(_) => "a list",
        Literal::Dict(_) => "a record",
    }
}

fn literal_to_cell(literal: &Literal) -> CellValue {
    match literal {
        Literal::Bool(b) => CellValue::Bool(*b),
        Literal::Int(i) => CellValue::Int(*i),
        Literal::Float(f) => CellValue::Float(*f),
        Literal::String(s) => CellValue::Text(s.clone()),
        Literal::Null | Literal::List(_) | Literal::Dict(_) => CellValue::Null,
    }
}

/// One row of the birthday table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRow {
    pub month: String,
    pub list: BirthdayList,
}

/// The birthday table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthTable {
    rows: Vec<MonthRow>,
}

impl MonthTable {
    #[must_use]
    pub fn new(rows: Vec<MonthRow>) -> Self {
        Self { rows }
    }

    /// Read the month and list columns from a sheet.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingColumn`] when either column is absent.
    pub fn from_sheet(sheet: &Sheet, columns: &ColumnNames) -> DashResult<Self> {
        let sheet = named(sheet, InputKind::Birthdays)?;
        let find = |column: &str| {
            sheet
                .column_index_by_name(column)
                .map_err(|_| DashboardError::MissingColumn {
                    table: InputKind::Birthdays,
                    column: column.to_string(),
                })
        };
        let month_col = find(&columns.month)?;
        let list_col = find(&columns.birthday_list)?;

        let rows: Vec<MonthRow> = sheet
            .data_rows()
            .filter_map(|row| {
                let month = row.get(month_col).and_then(CellValue::as_text)?;
                let list = row
                    .get(list_col)
                    .map(BirthdayList::from_cell)
                    .unwrap_or(BirthdayList::Structured(Vec::new()));
                Some(MonthRow {
                    month: month.trim().to_string(),
                    list,
                })
            })
            .collect();

        debug!(rows = rows.len(), "Loaded birthday table");
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[MonthRow] {
        &self.rows
    }

    /// The row for `month`, compared case-insensitively.
    #[must_use]
    pub fn find(&self, month: &str) -> Option<&MonthRow> {
        let wanted = month.trim().to_lowercase();
        self.rows.iter().find(|row| row.month.trim().to_lowercase() == wanted)
    }
}

/// A decoded record with its parsed date and roster phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayEntry {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub phone: String,
}

/// A birthday in the current month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Birthday {
    pub name: String,
    pub day: u32,
    pub formatted_date: String,
    pub phone: String,
}

/// Result of resolving the current month's birthdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BirthdayReport {
    /// The table has no row for the month.
    NoMonthData { month: String },
    /// Birthdays in the month, ordered by day. May be empty.
    Found { month: String, birthdays: Vec<Birthday> },
}

/// Parse dates and attach phone numbers, keeping list order.
#[must_use]
pub fn birthday_entries(raw: &[RawBirthday], roster: &Roster, not_found: &str) -> Vec<BirthdayEntry> {
    raw.iter()
        .map(|r| {
            let date = parse_birthday(&r.birthday);
            if date.is_none() && !r.birthday.is_blank() {
                warn!(name = %r.name, value = %r.birthday, "Unparseable birthday");
            }
            BirthdayEntry {
                name: r.name.clone(),
                date,
                phone: roster.phone_for(&r.name).unwrap_or(not_found).to_string(),
            }
        })
        .collect()
}

/// Entries born in `month`, sorted by day of month.
#[must_use]
pub fn birthdays_in_month(entries: Vec<BirthdayEntry>, month: u32) -> Vec<Birthday> {
    let mut birthdays: Vec<Birthday> = entries
        .into_iter()
        .filter_map(|entry| {
            let date = entry.date.filter(|d| d.month() == month)?;
            Some(Birthday {
                name: entry.name,
                day: date.day(),
                formatted_date: format_day_month(date),
                phone: entry.phone,
            })
        })
        .collect();
    birthdays.sort_by_key(|b| b.day);
    birthdays
}

/// Resolve the birthdays of `today`'s month.
///
/// # Errors
///
/// Returns a [`BirthdayError`] when the month's list cannot be decoded.
pub fn resolve_birthdays(
    roster: &Roster,
    table: &MonthTable,
    today: NaiveDate,
    settings: &ReportSettings,
) -> Result<BirthdayReport, BirthdayError> {
    let month = settings.month_name(today.month()).unwrap_or_default().to_string();

    let Some(row) = table.find(&month) else {
        debug!(%month, "No birthday row for month");
        return Ok(BirthdayReport::NoMonthData { month });
    };

    let raw = row.list.decode(&settings.columns)?;
    let entries = birthday_entries(&raw, roster, &settings.not_found);
    let birthdays = birthdays_in_month(entries, today.month());
    Ok(BirthdayReport::Found { month, birthdays })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::ClientRecord;

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![
            ClientRecord::new("Ana", "Aposentada", "111", None),
            ClientRecord::new("Bob", "Engenheiro", "222", None),
        ])
    }

    fn table(list: BirthdayList) -> MonthTable {
        MonthTable::new(vec![
            MonthRow {
                month: "Fevereiro".to_string(),
                list: BirthdayList::Raw("[]".to_string()),
            },
            MonthRow {
                month: " março ".to_string(),
                list,
            },
        ])
    }

    #[test]
    fn test_decode_raw() {
        let list = BirthdayList::Raw(
            "[{'Nome': 'Ana', 'Aniversario': '1950-03-15'}, {'Nome': 'Bob', 'Aniversario': None}, {'Aniversario': 18337}]"
                .to_string(),
        );
        let decoded = list.decode(&ColumnNames::default()).unwrap();
        assert_eq!(
            decoded,
            vec![
                RawBirthday::new("Ana", "1950-03-15"),
                RawBirthday::new("Bob", CellValue::Null),
                RawBirthday::new("", CellValue::Int(18337)),
            ]
        );
    }

    #[test]
    fn test_decode_blank_and_structured() {
        let columns = ColumnNames::default();
        assert!(BirthdayList::Raw("  ".to_string()).decode(&columns).unwrap().is_empty());
        assert!(BirthdayList::from_cell(&CellValue::Null).decode(&columns).unwrap().is_empty());

        let records = vec![RawBirthday::new("Ana", "1950-03-15")];
        assert_eq!(
            BirthdayList::Structured(records.clone()).decode(&columns).unwrap(),
            records
        );
    }

    #[test]
    fn test_decode_errors() {
        let columns = ColumnNames::default();
        let err = BirthdayList::Raw("[{'Nome': 'Ana'".to_string())
            .decode(&columns)
            .unwrap_err();
        assert!(matches!(err, BirthdayError::Parse(_)));

        let err = BirthdayList::Raw("{'Nome': 'Ana'}".to_string())
            .decode(&columns)
            .unwrap_err();
        assert!(matches!(err, BirthdayError::Shape(_)));

        let err = BirthdayList::Raw("['Ana']".to_string()).decode(&columns).unwrap_err();
        assert!(matches!(err, BirthdayError::Shape(_)));
    }

    #[test]
    fn test_month_lookup() {
        let t = table(BirthdayList::Raw("[]".to_string()));
        assert!(t.find("Março").is_some());
        assert!(t.find("MARÇO").is_some());
        assert!(t.find("Abril").is_none());
    }

    #[test]
    fn test_resolve_filters_and_sorts() {
        let list = BirthdayList::Raw(
            r#"[{"Nome": "Bob", "Aniversario": "1980-03-20"},
                {"Nome": "Zé", "Aniversario": "1975-03-02"},
                {"Nome": "Ana", "Aniversario": "1950-04-15"},
                {"Nome": "Ana", "Aniversario": "nunca"}]"#
                .to_string(),
        );
        let report =
            resolve_birthdays(&roster(), &table(list), march(), &ReportSettings::default()).unwrap();

        let BirthdayReport::Found { month, birthdays } = report else {
            panic!("expected birthdays");
        };
        assert_eq!(month, "Março");
        assert_eq!(
            birthdays,
            vec![
                Birthday {
                    name: "Zé".to_string(),
                    day: 2,
                    formatted_date: "02/03".to_string(),
                    phone: "Não encontrado".to_string(),
                },
                Birthday {
                    name: "Bob".to_string(),
                    day: 20,
                    formatted_date: "20/03".to_string(),
                    phone: "222".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_resolve_no_month_row() {
        let t = MonthTable::new(vec![]);
        let report = resolve_birthdays(&roster(), &t, march(), &ReportSettings::default()).unwrap();
        assert_eq!(
            report,
            BirthdayReport::NoMonthData {
                month: "Março".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_same_day_keeps_list_order() {
        let list = BirthdayList::Structured(vec![
            RawBirthday::new("Bob", "2000-03-05"),
            RawBirthday::new("Ana", "1950-03-05"),
        ]);
        let report =
            resolve_birthdays(&roster(), &table(list), march(), &ReportSettings::default()).unwrap();
        let BirthdayReport::Found { birthdays, .. } = report else {
            panic!("expected birthdays");
        };
        let names: Vec<&str> = birthdays.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ana"]);
    }

    #[test]
    fn test_nameless_record_gets_sentinel_phone() {
        let roster = Roster::new(vec![ClientRecord::new("", "Engenheiro", "999", None)]);
        let raw = BirthdayList::Raw("[{'Aniversario': '1950-03-15'}]".to_string())
            .decode(&ColumnNames::default())
            .unwrap();

        let entries = birthday_entries(&raw, &roster, "Não encontrado");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "");
        assert_eq!(entries[0].phone, "Não encontrado");
    }

    #[test]
    fn test_month_table_from_sheet() {
        let sheet = Sheet::from_table(
            "infos",
            &["Mês", "lista_aniversariantes"],
            vec![
                vec!["Janeiro".into(), "[]".into()],
                vec![CellValue::Null, "[]".into()],
                vec!["Março".into(), CellValue::Null],
            ],
        )
        .unwrap();
        let t = MonthTable::from_sheet(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(t.rows().len(), 2);
        assert_eq!(t.rows()[1].list, BirthdayList::Structured(vec![]));

        let bad = Sheet::from_table("infos", &["Mês"], vec![]).unwrap();
        let err = MonthTable::from_sheet(&bad, &ColumnNames::default()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::MissingColumn {
                table: InputKind::Birthdays,
                ..
            }
        ));
    }
}
