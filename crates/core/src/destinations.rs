//! Destination extraction and popularity counting.

use indexmap::IndexMap;
use serde::Serialize;

/// A destination and how many times it was visited across the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationCount {
    pub destination: String,
    pub count: usize,
}

impl DestinationCount {
    pub fn new(destination: impl Into<String>, count: usize) -> Self {
        Self {
            destination: destination.into(),
            count,
        }
    }
}

/// Title-case a destination name.
///
/// A word starts at any letter that does not follow another letter; the
/// first letter of a word is uppercased and the rest lowercased. Applying it
/// twice gives the same result.
///
/// ```
/// use tripdash_core::normalize_destination;
///
/// assert_eq!(normalize_destination("  são PAULO "), "São Paulo");
/// assert_eq!(normalize_destination("d'ávila"), "D'Ávila");
/// ```
#[must_use]
pub fn normalize_destination(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;

    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Split one raw trips field into trimmed, non-empty tokens.
pub(crate) fn trip_tokens(trips: &str) -> impl Iterator<Item = &str> {
    trips.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Flatten the trips fields of every record into normalized destinations.
///
/// Missing fields contribute nothing. Order follows records, then tokens
/// within a record.
pub fn extract_destinations<'a, I>(trips: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    trips
        .into_iter()
        .flatten()
        .flat_map(trip_tokens)
        .map(normalize_destination)
        .filter(|d| !d.is_empty())
        .collect()
}

/// Count every distinct destination.
///
/// Sorted by count, highest first; equal counts keep the order in which the
/// destinations were first seen.
#[must_use]
pub fn count_destinations(destinations: &[String]) -> Vec<DestinationCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for destination in destinations {
        *counts.entry(destination.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<DestinationCount> = counts
        .into_iter()
        .map(|(destination, count)| DestinationCount::new(destination, count))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// The `top_n` most visited destinations, optionally restricted to those
/// containing `filter`.
///
/// The filter is normalized like a destination before matching, so
/// `"rio de"` matches `"Rio De Janeiro"`. A blank filter matches everything.
#[must_use]
pub fn popularity(destinations: &[String], filter: Option<&str>, top_n: usize) -> Vec<DestinationCount> {
    let needle = filter
        .map(normalize_destination)
        .filter(|needle| !needle.is_empty());

    let mut ranked = count_destinations(destinations);
    if let Some(needle) = needle {
        ranked.retain(|entry| entry.destination.contains(&needle));
    }
    ranked.truncate(top_n);
    ranked
}
