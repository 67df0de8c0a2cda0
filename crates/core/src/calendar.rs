//! Date helpers for birthday values.

use chrono::{Days, NaiveDate, NaiveDateTime};
use tripdash_sheet::CellValue;

/// Day zero of spreadsheet serial dates (1900 date system).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Convert a spreadsheet serial date to a calendar date.
///
/// The fractional part (time of day) is ignored.
#[must_use]
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    let days = serial.floor() as u64;
    epoch.checked_add_days(Days::new(days))
}

/// Parse a birthday text in one of the accepted formats.
#[must_use]
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| text.parse::<f64>().ok().and_then(serial_to_date))
}

/// Interpret a cell as a birthday. Numbers are serial dates.
#[must_use]
pub fn parse_birthday(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Null | CellValue::Bool(_) => None,
        CellValue::Int(i) => serial_to_date(*i as f64),
        CellValue::Float(f) => serial_to_date(*f),
        CellValue::Text(s) => parse_date_text(s),
    }
}

/// `DD/MM` display form.
#[must_use]
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(serial_to_date(25569.0), Some(ymd(1970, 1, 1)));
        assert_eq!(serial_to_date(45000.75), Some(ymd(2023, 3, 15)));
        assert_eq!(serial_to_date(0.0), None);
        assert_eq!(serial_to_date(f64::NAN), None);
    }

    #[test]
    fn test_text_formats() {
        let expected = Some(ymd(1950, 3, 15));
        assert_eq!(parse_date_text("1950-03-15"), expected);
        assert_eq!(parse_date_text(" 1950-03-15 00:00:00 "), expected);
        assert_eq!(parse_date_text("1950-03-15T08:30:00"), expected);
        assert_eq!(parse_date_text("1950/03/15"), expected);
        assert_eq!(parse_date_text("15/03/1950"), expected);
        assert_eq!(parse_date_text("15-03-1950"), expected);
        assert_eq!(parse_date_text("18337"), expected);
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("amanhã"), None);
        assert_eq!(parse_date_text("1950-02-30"), None);
        assert_eq!(parse_birthday(&CellValue::Null), None);
        assert_eq!(parse_birthday(&CellValue::Bool(true)), None);
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(parse_birthday(&CellValue::Int(18337)), Some(ymd(1950, 3, 15)));
        assert_eq!(parse_birthday(&CellValue::Float(18337.0)), Some(ymd(1950, 3, 15)));
        assert_eq!(parse_birthday(&"02/01/1990".into()), Some(ymd(1990, 1, 2)));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_day_month(ymd(1950, 3, 5)), "05/03");
    }
}
