//! Cell values as they come out of a workbook or a delimited file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One spreadsheet cell.
///
/// Serializes untagged, so a row of cells becomes a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Infer a value from a delimited-file field.
    ///
    /// Blank fields become `Null`. Digit runs with a leading zero or a `+`
    /// stay text, so phone numbers like `011999` or `+5511999990000` keep
    /// their prefix.
    #[must_use]
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if !looks_numeric(trimmed) {
            return Self::Text(field.to_string());
        }

        trimmed
            .parse::<i64>()
            .ok()
            .map(Self::Int)
            .or_else(|| trimmed.parse::<f64>().ok().map(Self::Float))
            .unwrap_or_else(|| Self::Text(field.to_string()))
    }

    /// Null, or text made only of whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Display text of the cell. `Null` is the empty string and whole floats
    /// drop their fraction, so `11987654321.0` reads `11987654321`.
    #[must_use]
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Display text, or `None` for a blank cell.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        (!self.is_blank()).then(|| self.as_str())
    }
}

// Rejects words such as "inf" or "NaN" that f64 would otherwise accept, and
// numbers whose leading `+` or zero is significant.
fn looks_numeric(s: &str) -> bool {
    if s.starts_with('+') {
        return false;
    }
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let starts_with_digit = unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.');
    let zero_padded = unsigned.len() > 1 && unsigned.starts_with('0') && !unsigned.starts_with("0.");
    starts_with_digit && !zero_padded
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
