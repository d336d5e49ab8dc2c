//! collect command: Gather document links from plan documentation pages
//!
//! Each page is fetched once, its document links are classified against the
//! reference table, and pages that fail are set aside without stopping the run.

use crate::error::Result;
use crate::extract::extract_links;
use crate::fetch::{parse_page_url, PageFetcher, DEFAULT_USER_AGENT};
use crate::reference::ReferenceTable;
use crate::schema::{DocumentType, ExtractedLink, FailedFetch, LinkRecord, SourcePage};
use crate::table::{read_reference_table, read_source_pages, write_failures, write_links};
use anyhow::Context;
use chrono::Utc;
use clap::Args;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct CollectArgs {
    /// Source table with `reference` and `documentation-url` columns
    #[arg(short, long, value_name = "CSV", env = "PLAN_DOCS_INPUT")]
    input: PathBuf,

    /// Reference table with `name` and `reference` columns
    #[arg(short, long, value_name = "CSV", env = "PLAN_DOCS_REFERENCE")]
    reference: PathBuf,

    /// Where to write the collected links
    #[arg(short, long, value_name = "CSV", env = "PLAN_DOCS_OUTPUT")]
    output: PathBuf,

    /// Where to write pages that failed (only written if any did)
    #[arg(short, long, value_name = "CSV", env = "PLAN_DOCS_FAILED")]
    failed: Option<PathBuf>,

    /// Pages fetched at once (1-32); output keeps input order
    #[arg(short, long, default_value = "1", env = "PLAN_DOCS_CONCURRENCY",
          value_parser = clap::value_parser!(u8).range(1..=32))]
    concurrency: u8,

    /// Request timeout in seconds (default: none)
    #[arg(long, env = "PLAN_DOCS_TIMEOUT")]
    timeout: Option<u64>,

    /// Lowest similarity (0-100) accepted as a classification (default: any)
    #[arg(long, env = "PLAN_DOCS_MIN_SCORE",
          value_parser = clap::value_parser!(u8).range(0..=100))]
    min_score: Option<u8>,

    /// Verify TLS certificates (off by default, council sites often serve broken chains)
    #[arg(long, env = "PLAN_DOCS_VERIFY_TLS")]
    verify_tls: bool,

    /// User-Agent header sent with every request
    #[arg(long, env = "PLAN_DOCS_USER_AGENT", default_value = DEFAULT_USER_AGENT,
          hide_default_value = true)]
    user_agent: String,
}

/// Configuration for collect
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub concurrency: usize,
    pub timeout_secs: Option<u64>,
    /// `None` accepts the best match however poor it is
    pub min_score: Option<u8>,
    pub verify_tls: bool,
    pub user_agent: String,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            timeout_secs: None,
            min_score: None,
            verify_tls: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&CollectArgs> for CollectConfig {
    fn from(args: &CollectArgs) -> Self {
        Self {
            concurrency: args.concurrency as usize,
            timeout_secs: args.timeout,
            min_score: args.min_score,
            verify_tls: args.verify_tls,
            user_agent: args.user_agent.clone(),
        }
    }
}

/// Links and failures for a whole run
#[derive(Debug, Default)]
pub struct CollectReport {
    pub pages: usize,
    /// Result rows in page order, fallback category already applied
    pub links: Vec<LinkRecord>,
    pub failed: Vec<FailedFetch>,
    /// Links that fell back to the default category
    pub unmatched: usize,
}

/// Compact run summary printed to stdout
#[derive(Debug, Serialize)]
pub struct CollectSummary {
    pub pages: usize,
    pub ok: usize,
    pub failed: usize,
    pub links: usize,
    pub unmatched: usize,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_output: Option<String>,
    pub timestamp: String,
}

/// Run the collect command
pub async fn run_collect(args: CollectArgs) -> anyhow::Result<()> {
    let pages = read_source_pages(&args.input)
        .with_context(|| format!("Failed to read source table: {}", args.input.display()))?;
    let reference = read_reference_table(&args.reference).with_context(|| {
        format!(
            "Failed to read reference table: {}",
            args.reference.display()
        )
    })?;

    let config = CollectConfig::from(&args);

    eprintln!(
        "Collecting document links from {} page{} ({} reference types, {} parallel)...",
        pages.len(),
        if pages.len() == 1 { "" } else { "s" },
        reference.len(),
        config.concurrency
    );

    let report = collect_links(&pages, &reference, &config)
        .await
        .context("Failed to set up HTTP client")?;

    write_links(&args.output, &report.links)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    eprintln!("Data saved as {}", args.output.display());

    let failed_output = match &args.failed {
        Some(path) if !report.failed.is_empty() => {
            write_failures(path, &report.failed)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Failed URLs saved to {}", path.display());
            Some(path.display().to_string())
        }
        _ => None,
    };

    if !report.failed.is_empty() {
        eprintln!("\nThe following URLs failed during processing:");
        for failure in &report.failed {
            eprintln!(
                "  Reference: {}, URL: {} ({})",
                failure.reference, failure.documentation_url, failure.error
            );
        }
    }

    let summary = CollectSummary {
        pages: report.pages,
        ok: report.pages - report.failed.len(),
        failed: report.failed.len(),
        links: report.links.len(),
        unmatched: report.unmatched,
        output: args.output.display().to_string(),
        failed_output,
        timestamp: Utc::now().to_rfc3339(),
    };

    // Output compact JSON to stdout
    println!("{}", serde_json::to_string(&summary)?);

    eprintln!(
        "Done: {}/{} pages OK, {} links",
        summary.ok, summary.pages, summary.links
    );

    Ok(())
}

/// Collect links from every page, in input order.
///
/// Page failures land in the report; the only error is a client that cannot
/// be built from `config`.
pub async fn collect_links(
    pages: &[SourcePage],
    reference: &ReferenceTable,
    config: &CollectConfig,
) -> Result<CollectReport> {
    let fetcher = PageFetcher::new(config)?;

    let outcomes: Vec<Result<Vec<ExtractedLink>>> = stream::iter(pages)
        .map(|page| collect_page(&fetcher, page, reference, config.min_score))
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    let mut report = CollectReport {
        pages: pages.len(),
        ..CollectReport::default()
    };

    for (page, outcome) in pages.iter().zip(outcomes) {
        match outcome {
            Ok(links) => {
                info!(reference = %page.reference, links = links.len(), "Collected page");
                for link in links {
                    if link.document_type == DocumentType::Unmatched {
                        report.unmatched += 1;
                    }
                    report.links.push(LinkRecord::from(link));
                }
            }
            Err(e) => {
                warn!(reference = %page.reference, url = %page.url, error = %e, "Failed to process page");
                report.failed.push(FailedFetch {
                    reference: page.reference.clone(),
                    documentation_url: page.url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// pending -> fetching -> succeeded | failed, one attempt
async fn collect_page(
    fetcher: &PageFetcher,
    page: &SourcePage,
    reference: &ReferenceTable,
    min_score: Option<u8>,
) -> Result<Vec<ExtractedLink>> {
    let base = parse_page_url(&page.url)?;
    info!(reference = %page.reference, url = %base, "Fetching page");
    let html = fetcher.fetch(&base).await?;
    extract_links(&html, page, &base, reference, min_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectConfig::default();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.min_score, None);
        assert_eq!(config.timeout_secs, None);
        assert!(!config.verify_tls);
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_fetch() {
        let pages = vec![
            SourcePage {
                reference: "plan-1".to_string(),
                url: "not a url".to_string(),
            },
            SourcePage {
                reference: "plan-2".to_string(),
                url: "".to_string(),
            },
        ];
        let report = collect_links(&pages, &ReferenceTable::default(), &CollectConfig::default())
            .await
            .unwrap();

        assert_eq!(report.pages, 2);
        assert!(report.links.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].reference, "plan-1");
        assert!(report.failed[0].error.contains("Invalid URL"));
        assert_eq!(report.failed[1].documentation_url, "");
    }

    #[tokio::test]
    async fn test_no_pages() {
        let report = collect_links(&[], &ReferenceTable::default(), &CollectConfig::default())
            .await
            .unwrap();
        assert_eq!(report.pages, 0);
        assert!(report.links.is_empty());
        assert!(report.failed.is_empty());
    }
}
