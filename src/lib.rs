//! plan-docs: Collect and classify document links from plan documentation pages
//!
//! Commands:
//! - collect: Fetch each page in a source table, keep links that look like
//!   documents, and classify them against a document-type reference table

pub mod clean;
pub mod collect;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod reference;
pub mod schema;
pub mod similarity;
pub mod table;

pub use collect::{collect_links, CollectConfig, CollectReport};
pub use error::{PageError, TableError};
pub use reference::ReferenceTable;
pub use schema::{
    DocumentType, ExtractedLink, FailedFetch, LinkRecord, ReferenceEntry, SourcePage,
    FALLBACK_DOCUMENT_TYPE,
};
