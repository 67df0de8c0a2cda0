//! Retiree selection.

use crate::roster::ClientRecord;

/// Records whose profession is exactly one of `labels`, in roster order.
#[must_use]
pub fn filter_retirees<'a, S: AsRef<str>>(records: &'a [ClientRecord], labels: &[S]) -> Vec<&'a ClientRecord> {
    records
        .iter()
        .filter(|r| labels.iter().any(|label| label.as_ref() == r.profession))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 2] = ["Aposentado", "Aposentada"];

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![
            ClientRecord::new("Ana", "Aposentada", "1", None),
            ClientRecord::new("Bob", "Engenheiro", "2", None),
            ClientRecord::new("Caio", "Aposentado", "3", None),
            ClientRecord::new("Dora", "aposentada", "4", None),
        ];
        let names: Vec<&str> = filter_retirees(&records, &LABELS)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Caio"]);
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter_retirees(&[], &LABELS).is_empty());
        let records = vec![ClientRecord::new("Bob", "Engenheiro", "2", None)];
        assert!(filter_retirees(&records, &LABELS).is_empty());
        assert!(filter_retirees::<&str>(&records, &[]).is_empty());
    }

    #[test]
    fn test_custom_labels() {
        let records = vec![ClientRecord::new("Eva", "Pensionista", "5", None)];
        assert_eq!(filter_retirees(&records, &["Pensionista".to_string()]).len(), 1);
    }
}
