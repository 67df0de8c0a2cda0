//! Literal builder - converts the pest parse tree to [`Literal`] values.

use indexmap::IndexMap;
use pest::iterators::Pair;

use crate::{Literal, LiteralError, Rule};

type BuildResult<T> = Result<T, LiteralError>;

fn error_at(pair: &Pair<Rule>, message: impl Into<String>) -> LiteralError {
    let (line, column) = pair.line_col();
    LiteralError::new(line, column, message)
}

/// Build the single value of a `document` pair.
pub(crate) fn build_document(pair: Pair<Rule>) -> BuildResult<Literal> {
    let value = pair
        .into_inner()
        .find(|inner| inner.as_rule() != Rule::EOI)
        .ok_or_else(|| LiteralError::new(1, 1, "empty document"))?;
    build_value(value)
}

fn build_value(pair: Pair<Rule>) -> BuildResult<Literal> {
    match pair.as_rule() {
        Rule::null => Ok(Literal::Null),
        Rule::boolean => Ok(Literal::Bool(pair.as_str().eq_ignore_ascii_case("true"))),
        Rule::integer => pair
            .as_str()
            .parse()
            .map(Literal::Int)
            .or_else(|_| {
                // Too large for i64; keep the magnitude as a float
                pair.as_str()
                    .parse()
                    .map(Literal::Float)
                    .map_err(|_| error_at(&pair, "Invalid integer"))
            }),
        Rule::float => pair
            .as_str()
            .parse()
            .map(Literal::Float)
            .map_err(|_| error_at(&pair, "Invalid float")),
        Rule::string => Ok(Literal::String(build_string(pair.as_str()))),
        Rule::list | Rule::tuple => pair
            .into_inner()
            .map(build_value)
            .collect::<BuildResult<Vec<_>>>()
            .map(Literal::List),
        Rule::dict => build_dict(pair),
        other => Err(error_at(&pair, format!("Unexpected token: {other:?}"))),
    }
}

fn build_dict(pair: Pair<Rule>) -> BuildResult<Literal> {
    let mut map = IndexMap::new();
    for entry in pair.into_inner() {
        let mut inner = entry.into_inner();
        let (Some(key_pair), Some(value_pair)) = (inner.next(), inner.next()) else {
            return Err(LiteralError::new(1, 1, "Incomplete dictionary entry"));
        };
        let key_text = match build_value(key_pair.clone())? {
            Literal::String(s) => s,
            scalar => scalar
                .to_text()
                .ok_or_else(|| error_at(&key_pair, "Dictionary keys must be scalars"))?,
        };
        map.insert(key_text, build_value(value_pair)?);
    }
    Ok(Literal::Dict(map))
}

/// Strip the surrounding quotes and resolve escapes.
fn build_string(raw: &str) -> String {
    let body = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    unescape_string(body)
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            Some('/') => result.push('/'),
            Some('0') => result.push('\0'),
            Some('x') => push_code_point(&mut result, &mut chars, 2, 'x'),
            Some('u') => push_code_point(&mut result, &mut chars, 4, 'u'),
            Some('U') => push_code_point(&mut result, &mut chars, 8, 'U'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

fn push_code_point(result: &mut String, chars: &mut std::str::Chars<'_>, width: usize, tag: char) {
    let hex: String = chars.by_ref().take(width).collect();
    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
        Some(ch) if hex.len() == width => result.push(ch),
        _ => {
            result.push('\\');
            result.push(tag);
            result.push_str(&hex);
        }
    }
}
