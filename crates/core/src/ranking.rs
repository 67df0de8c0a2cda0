//! Client ranking by number of destinations.

use serde::Serialize;

use crate::destinations::trip_tokens;
use crate::roster::ClientRecord;

/// A client and the number of destinations in their trips field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRanking {
    pub client: String,
    pub destinations: usize,
}

impl ClientRanking {
    pub fn new(client: impl Into<String>, destinations: usize) -> Self {
        Self {
            client: client.into(),
            destinations,
        }
    }
}

/// Number of non-empty destinations in a raw trips field.
#[must_use]
pub fn count_trips(trips: Option<&str>) -> usize {
    trips.map_or(0, |t| trip_tokens(t).count())
}

/// One entry per record, most destinations first.
///
/// Duplicate names are kept as separate entries and ties keep roster order.
#[must_use]
pub fn rank_clients(records: &[ClientRecord]) -> Vec<ClientRanking> {
    let mut ranking: Vec<ClientRanking> = records
        .iter()
        .map(|r| ClientRanking::new(r.name.clone(), count_trips(r.trips.as_deref())))
        .collect();
    ranking.sort_by(|a, b| b.destinations.cmp(&a.destinations));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_trips() {
        assert_eq!(count_trips(None), 0);
        assert_eq!(count_trips(Some("")), 0);
        assert_eq!(count_trips(Some(" , ,")), 0);
        assert_eq!(count_trips(Some("paris, Paris ,  rome")), 3);
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let records = vec![
            ClientRecord::new("Bob", "", "", None),
            ClientRecord::new("Ana", "", "", Some("a, b")),
            ClientRecord::new("Caio", "", "", Some("c")),
            ClientRecord::new("Ana", "", "", Some("d")),
        ];
        assert_eq!(
            rank_clients(&records),
            vec![
                ClientRanking::new("Ana", 2),
                ClientRanking::new("Caio", 1),
                ClientRanking::new("Ana", 1),
                ClientRanking::new("Bob", 0),
            ]
        );
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_clients(&[]).is_empty());
    }
}
