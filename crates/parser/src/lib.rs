//! # tripdash-parser
//!
//! Parser for serialized literal values stored in spreadsheet cells, such as
//! the per-month birthday lists:
//!
//! ```text
//! [{'Nome': 'Ana', 'Aniversario': '1950-03-15'}, {"Nome": "Bob", "Aniversario": null}]
//! ```
//!
//! Both Python `repr()` syntax (single quotes, `True`/`False`/`None`, tuples)
//! and JSON are accepted. This crate uses [pest](https://pest.rs) for parsing.

mod builder;

use indexmap::IndexMap;
use pest::Parser as _;
use pest_derive::Parser;
use serde::Serialize;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "literal.pest"]
struct LiteralParser;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Lists and tuples.
    List(Vec<Literal>),
    /// Dictionaries, keys in source order.
    Dict(IndexMap<String, Literal>),
}

impl Literal {
    /// Borrow the items of a list literal.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the entries of a dictionary literal.
    #[must_use]
    pub fn as_dict(&self) -> Option<&IndexMap<String, Literal>> {
        match self {
            Literal::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a dictionary key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Literal> {
        self.as_dict().and_then(|map| map.get(key))
    }

    /// Render a scalar as text; `None` for null and containers.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Literal::Null | Literal::List(_) | Literal::Dict(_) => None,
            Literal::Bool(b) => Some(b.to_string()),
            Literal::Int(i) => Some(i.to_string()),
            Literal::Float(f) => Some(f.to_string()),
            Literal::String(s) => Some(s.clone()),
        }
    }

    /// Convert to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Error raised for malformed literal text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct LiteralError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl LiteralError {
    pub(crate) fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl From<pest::error::Error<Rule>> for LiteralError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, column) = match e.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        Self::new(line, column, e.variant.message().into_owned())
    }
}

/// Parse a literal document.
///
/// # Errors
///
/// Returns a [`LiteralError`] with the location of the first invalid token.
///
/// ```
/// use tripdash_parser::{parse_literal, Literal};
///
/// let value = parse_literal("[{'Nome': 'Ana', 'Aniversario': '1950-03-15'}]").unwrap();
/// let first = &value.as_list().unwrap()[0];
/// assert_eq!(first.get("Nome"), Some(&Literal::String("Ana".to_string())));
/// ```
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut pairs = LiteralParser::parse(Rule::document, input)?;
    let document = pairs
        .next()
        .ok_or_else(|| LiteralError::new(1, 1, "empty document"))?;
    builder::build_document(document)
}
