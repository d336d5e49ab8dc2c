//! Document link extraction from council plan pages

use crate::clean::clean_text;
use crate::error::{PageError, Result};
use crate::reference::ReferenceTable;
use crate::schema::{ExtractedLink, SourcePage};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Substrings of a lower-cased href that mark it as a probable document
pub const DOCUMENT_MARKERS: [&str; 4] = ["pdf", "doc", "document", "file"];

/// Does this href look like it points at a document?
///
/// Matches on the URL text only, so `/documents/` navigation pages pass and
/// opaque download URLs do not.
pub fn is_document_href(href: &str) -> bool {
    let href = href.to_lowercase();
    DOCUMENT_MARKERS.iter().any(|marker| href.contains(marker))
}

/// An anchor with an href, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// All `<a href>` elements of a page with their stripped visible text
pub fn anchors(html: &str) -> Result<Vec<Anchor>> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("a[href]").map_err(|e| PageError::Parse(e.to_string()))?;

    Ok(doc
        .select(&selector)
        .filter_map(|el| {
            el.value().attr("href").map(|href| Anchor {
                href: href.to_string(),
                text: anchor_text(&el),
            })
        })
        .collect())
}

/// Text nodes stripped and concatenated, empty ones skipped
fn anchor_text(el: &ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract and classify every document link on a page.
///
/// Hrefs resolve against `base`, the parsed page URL; one that will not
/// resolve is kept as written. References are numbered `{plan}-1`, `{plan}-2`, ... over the retained links of this page
/// only.
pub fn extract_links(
    html: &str,
    page: &SourcePage,
    base: &Url,
    reference: &ReferenceTable,
    min_score: Option<u8>,
) -> Result<Vec<ExtractedLink>> {
    let mut links = Vec::new();

    for anchor in anchors(html)? {
        if !is_document_href(&anchor.href) {
            continue;
        }

        let document_url = match base.join(&anchor.href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!(href = %anchor.href, error = %e, "Keeping unresolvable href as is");
                anchor.href.clone()
            }
        };

        let name = clean_text(&anchor.text);
        let document_type = reference.classify(&name, min_score);
        let link_ref = format!("{}-{}", page.reference, links.len() + 1);

        debug!(reference = %link_ref, name = %name, document_type = %document_type, "Classified link");

        links.push(ExtractedLink {
            reference: link_ref,
            plan: page.reference.clone(),
            name,
            document_url,
            documentation_url: page.url.clone(),
            document_type,
        });
    }

    Ok(links)
}
