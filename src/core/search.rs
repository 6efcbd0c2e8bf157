//! Record search by track or jumbo identifier

use serde::Serialize;

use crate::core::dataset::{Dataset, Record};

/// Kind of identifier a query was interpreted as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// Numeric track identifier
    Track,
    /// Alphanumeric jumbo identifier
    Jumbo,
}

impl IdentifierKind {
    /// All-digit queries are tracks, anything else is a jumbo id
    pub fn detect(query: &str) -> Self {
        let trimmed = query.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            IdentifierKind::Track
        } else {
            IdentifierKind::Jumbo
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierKind::Track => write!(f, "Track"),
            IdentifierKind::Jumbo => write!(f, "Jumbo ID"),
        }
    }
}

/// Records matching an identifier query
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub query: String,
    pub kind: IdentifierKind,
    pub records: Vec<&'a Record>,
}

impl<'a> SearchResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn first(&self) -> Option<&'a Record> {
        self.records.first().copied()
    }

    /// Declared quality of the first match
    pub fn declared_quality(&self) -> Option<&'a str> {
        self.first().map(|r| r.quality.as_str())
    }

    /// Whether the first match is declared OK
    pub fn is_declared_ok(&self) -> bool {
        self.first().is_some_and(Record::is_declared_ok)
    }

    pub fn kit(&self) -> Option<&'a str> {
        self.first()
            .map(|r| r.kit.as_str())
            .filter(|k| !k.is_empty())
    }
}

/// Strip leading zeros so `007` and `7` name the same track
fn normalize_track(id: &str) -> &str {
    let stripped = id.trim().trim_start_matches('0');
    if stripped.is_empty() && !id.trim().is_empty() {
        "0"
    } else {
        stripped
    }
}

/// Find every record carrying the queried identifier
pub fn search<'a>(dataset: &'a Dataset, query: &str) -> SearchResult<'a> {
    let trimmed = query.trim();
    let kind = IdentifierKind::detect(trimmed);

    let records: Vec<&Record> = if trimmed.is_empty() {
        Vec::new()
    } else {
        match kind {
            IdentifierKind::Track => {
                let wanted = normalize_track(trimmed);
                dataset
                    .records()
                    .iter()
                    .filter(|r| !r.track.trim().is_empty() && normalize_track(&r.track) == wanted)
                    .collect()
            }
            IdentifierKind::Jumbo => dataset
                .records()
                .iter()
                .filter(|r| r.jumbo_id.trim() == trimmed)
                .collect(),
        }
    };

    tracing::debug!(query = trimmed, %kind, matches = records.len(), "searched records");

    SearchResult {
        query: trimmed.to_string(),
        kind,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Track,Jumbo_ID,KIT,Quality,CALIPER
12345,ABCD123,K-77,OK,260
12345,ABCD123,K-77,OK,262
00777,JB777,,NOT OK,300
42,XYZ9,K1,ok,255
";

    fn ds() -> Dataset {
        Dataset::from_reader(CSV.as_bytes(), &[]).unwrap()
    }

    #[test]
    fn test_detect_identifier_kind() {
        assert_eq!(IdentifierKind::detect("12345"), IdentifierKind::Track);
        assert_eq!(IdentifierKind::detect(" 007 "), IdentifierKind::Track);
        assert_eq!(IdentifierKind::detect("ABCD123"), IdentifierKind::Jumbo);
        assert_eq!(IdentifierKind::detect("12.5"), IdentifierKind::Jumbo);
        assert_eq!(IdentifierKind::detect(""), IdentifierKind::Jumbo);
    }

    #[test]
    fn test_track_search_returns_all_rows() {
        let dataset = ds();
        let result = search(&dataset, "12345");
        assert_eq!(result.kind, IdentifierKind::Track);
        assert_eq!(result.len(), 2);
        assert_eq!(result.declared_quality(), Some("OK"));
        assert!(result.is_declared_ok());
        assert_eq!(result.kit(), Some("K-77"));
    }

    #[test]
    fn test_track_search_ignores_leading_zeros() {
        let dataset = ds();
        let result = search(&dataset, "777");
        assert_eq!(result.len(), 1);
        assert!(!result.is_declared_ok());
        assert_eq!(result.kit(), None);
    }

    #[test]
    fn test_jumbo_search_is_exact() {
        let dataset = ds();
        let result = search(&dataset, " ABCD123 ");
        assert_eq!(result.kind, IdentifierKind::Jumbo);
        assert_eq!(result.len(), 2);
        assert!(search(&dataset, "abcd123").is_empty());
    }

    #[test]
    fn test_empty_and_unknown_queries_match_nothing() {
        let dataset = ds();
        assert!(search(&dataset, "").is_empty());
        assert!(search(&dataset, "   ").is_empty());
        let missing = search(&dataset, "99999");
        assert!(missing.is_empty());
        assert!(missing.first().is_none());
        assert!(!missing.is_declared_ok());
    }
}
