//! Table schema for the link collector
//!
//! Input rows, extracted links and the two output tables.

use serde::{Deserialize, Serialize};

/// Category written for links that did not match any reference entry
pub const FALLBACK_DOCUMENT_TYPE: &str = "supplementary-planning-documents";

/// One row of the source table: a plan and the page listing its documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePage {
    /// Plan identifier, used as the prefix of per-link references
    pub reference: String,
    /// Documentation page to collect links from
    #[serde(rename = "documentation-url")]
    pub url: String,
}

/// One row of the document-type lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Human label matched against link text
    pub name: String,
    /// Canonical document-type id returned on match
    pub reference: String,
}

/// Classification of a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentType {
    /// Best reference entry for the link text
    Matched(String),
    /// Nothing to match against, or the best score fell below the cutoff
    Unmatched,
}

impl DocumentType {
    /// Resolve to the written category, substituting the fallback
    pub fn resolve(&self) -> &str {
        match self {
            DocumentType::Matched(reference) => reference,
            DocumentType::Unmatched => FALLBACK_DOCUMENT_TYPE,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resolve())
    }
}

/// A document link found on a source page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Synthetic `{plan}-{n}` id, unique within the page
    pub reference: String,
    pub plan: String,
    /// Cleaned anchor text
    pub name: String,
    /// Absolute URL of the document
    pub document_url: String,
    /// Page the link was found on
    pub documentation_url: String,
    pub document_type: DocumentType,
}

/// One row of the result table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub reference: String,
    pub plan: String,
    pub name: String,
    #[serde(rename = "document-url")]
    pub document_url: String,
    #[serde(rename = "documentation-url")]
    pub documentation_url: String,
    #[serde(rename = "document-types")]
    pub document_types: String,
}

impl From<ExtractedLink> for LinkRecord {
    fn from(link: ExtractedLink) -> Self {
        let document_types = link.document_type.resolve().to_string();
        Self {
            reference: link.reference,
            plan: link.plan,
            name: link.name,
            document_url: link.document_url,
            documentation_url: link.documentation_url,
            document_types,
        }
    }
}

/// A page that could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFetch {
    pub reference: String,
    #[serde(rename = "documentation-url")]
    pub documentation_url: String,
    /// Failure message, reported on stderr but not written to the table
    #[serde(skip)]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(document_type: DocumentType) -> ExtractedLink {
        ExtractedLink {
            reference: "plan-1-1".to_string(),
            plan: "plan-1".to_string(),
            name: "Site Plan".to_string(),
            document_url: "http://example.test/files/a.pdf".to_string(),
            documentation_url: "http://example.test/page".to_string(),
            document_type,
        }
    }

    #[test]
    fn test_document_type_display() {
        assert_eq!(
            DocumentType::Matched("site-plans".to_string()).to_string(),
            "site-plans"
        );
        assert_eq!(
            DocumentType::Unmatched.to_string(),
            "supplementary-planning-documents"
        );
    }

    #[test]
    fn test_record_resolves_fallback() {
        let record = LinkRecord::from(link(DocumentType::Unmatched));
        assert_eq!(record.document_types, FALLBACK_DOCUMENT_TYPE);

        let record = LinkRecord::from(link(DocumentType::Matched("site-plans".to_string())));
        assert_eq!(record.document_types, "site-plans");
        assert_eq!(record.reference, "plan-1-1");
    }

    #[test]
    fn test_deserialize_source_page() {
        let json = r#"{"reference":"plan-1","documentation-url":"http://example.test/page"}"#;
        let page: SourcePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.reference, "plan-1");
        assert_eq!(page.url, "http://example.test/page");
    }

    #[test]
    fn test_failed_fetch_skips_error() {
        let failed = FailedFetch {
            reference: "plan-2".to_string(),
            documentation_url: "http://unreachable.test/".to_string(),
            error: "connection refused".to_string(),
        };
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("documentation-url"));
        assert!(!json.contains("connection refused"));
    }
}
