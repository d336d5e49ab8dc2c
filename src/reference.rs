//! Document-type lookup and best-match classification

use crate::schema::{DocumentType, ReferenceEntry};
use crate::similarity::{full_process, weighted_ratio};

/// Best entry for a piece of link text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub entry: &'a ReferenceEntry,
    pub score: u8,
}

/// Canonical document types, loaded once and shared read-only by every page
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
    processed: Vec<String>,
}

impl ReferenceTable {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        let processed = entries.iter().map(|e| full_process(&e.name)).collect();
        Self { entries, processed }
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest scoring entry for `text`, earliest row on ties.
    ///
    /// There is no floor: text unrelated to every name still gets the best
    /// of a bad bunch. Only an empty table returns `None`.
    pub fn best_match(&self, text: &str) -> Option<Match<'_>> {
        let query = full_process(text);
        let mut best: Option<Match<'_>> = None;

        for (entry, name) in self.entries.iter().zip(&self.processed) {
            let score = weighted_ratio(&query, name);
            if best.is_none_or(|b| score > b.score) {
                best = Some(Match { entry, score });
            }
        }

        best
    }

    /// Classify link text, treating scores below `min_score` as unmatched
    pub fn classify(&self, text: &str, min_score: Option<u8>) -> DocumentType {
        match self.best_match(text) {
            Some(m) if min_score.is_none_or(|floor| m.score >= floor) => {
                DocumentType::Matched(m.entry.reference.clone())
            }
            _ => DocumentType::Unmatched,
        }
    }
}

impl From<Vec<ReferenceEntry>> for ReferenceTable {
    fn from(entries: Vec<ReferenceEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, reference: &str) -> ReferenceEntry {
        ReferenceEntry {
            name: name.to_string(),
            reference: reference.to_string(),
        }
    }

    fn table() -> ReferenceTable {
        ReferenceTable::new(vec![
            entry("Local Plan", "local-plan"),
            entry("Site Plan Document", "site-plans"),
            entry("Statement of Community Involvement", "statement-of-community-involvement"),
            entry("Policies Map", "policies-map"),
        ])
    }

    #[test]
    fn test_best_match() {
        let table = table();
        let m = table.best_match("Site Plan").unwrap();
        assert_eq!(m.entry.reference, "site-plans");

        let m = table.best_match("Adopted Policies Map").unwrap();
        assert_eq!(m.entry.reference, "policies-map");

        let m = table.best_match("statement of community involvement 2019").unwrap();
        assert_eq!(m.entry.reference, "statement-of-community-involvement");
    }

    #[test]
    fn test_no_floor() {
        let table = table();
        let m = table.best_match("zzzz").unwrap();
        assert_eq!(m.score, 0);
        assert_eq!(m.entry.reference, "local-plan");
        assert_eq!(
            table.classify("zzzz", None),
            DocumentType::Matched("local-plan".to_string())
        );
    }

    #[test]
    fn test_empty_text_takes_first_row() {
        let table = table();
        assert_eq!(
            table.classify("", None),
            DocumentType::Matched("local-plan".to_string())
        );
    }

    #[test]
    fn test_min_score_cutoff() {
        let table = table();
        assert_eq!(table.classify("zzzz", Some(50)), DocumentType::Unmatched);
        assert_eq!(
            table.classify("Policies Map", Some(50)),
            DocumentType::Matched("policies-map".to_string())
        );
    }

    #[test]
    fn test_empty_table() {
        let table = ReferenceTable::default();
        assert!(table.is_empty());
        assert!(table.best_match("Local Plan").is_none());
        assert_eq!(table.classify("Local Plan", None), DocumentType::Unmatched);
    }

    #[test]
    fn test_ties_go_to_earliest_row() {
        let table = ReferenceTable::new(vec![
            entry("Local Plan", "first"),
            entry("Local Plan", "second"),
        ]);
        assert_eq!(
            table.classify("Local Plan", None),
            DocumentType::Matched("first".to_string())
        );
    }
}
