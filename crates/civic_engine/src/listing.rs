use std::collections::BTreeSet;

use civic_core::Clock;
use civic_logging::{civic_debug, civic_info, civic_warn};
use rayon::prelude::*;
use scraper::Html;
use url::Url;

use crate::config::{SiteConfig, SiteRules};
use crate::fetch::PageFetcher;
use crate::parse::EventRecordParser;
use crate::{ConfigError, FetchError, IntermediateEventRecord, UnparsableFragmentError};

/// A row that could not be parsed; its siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    /// Position of the row on its page.
    pub index: usize,
    pub error: UnparsableFragmentError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub page_url: String,
    /// Parsed rows in page order.
    pub records: Vec<IntermediateEventRecord>,
    pub failures: Vec<FragmentFailure>,
    pub next_page: Option<String>,
}

/// Row fragments of a listing page, as owned HTML, plus the next-page link.
///
/// `scraper::Html` is not `Send`, so fragments leave the page as source text
/// and are re-parsed by whichever worker picks them up.
pub fn split_listing(html: &str, page_url: &str, rules: &SiteRules) -> (Vec<String>, Option<String>) {
    let document = Html::parse_document(html);
    let fragments = document
        .select(&rules.listing)
        .map(|row| row.html())
        .collect();
    let next_page = rules.next_page.as_ref().and_then(|selector| {
        document
            .select(selector)
            .find_map(|link| link.value().attr("href"))
            .and_then(|href| resolve_link(page_url, href))
    });
    (fragments, next_page)
}

/// Resolve a hyperlink the way a browser would, relative to the page it sits
/// on. Fragment-only and `javascript:` links lead nowhere.
fn resolve_link(page_url: &str, href: &str) -> Option<String> {
    let trimmed = href.trim();
    let lower = trimmed.to_ascii_lowercase();
    if trimmed.is_empty() || lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    let base = Url::parse(page_url.trim()).ok()?;
    base.join(trimmed).ok().map(String::from)
}

/// Parses listing pages on a bounded worker pool.
pub struct ListingProcessor {
    rules: SiteRules,
    clock: Box<dyn Clock>,
    pool: rayon::ThreadPool,
}

impl ListingProcessor {
    pub fn new(config: &SiteConfig, clock: impl Clock + 'static) -> Result<Self, ConfigError> {
        let rules = config.compile()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(rules.concurrency)
            .thread_name(|i| format!("civic-parse-{i}"))
            .build()
            .map_err(|err| ConfigError::WorkerPool(err.to_string()))?;
        Ok(Self {
            rules,
            clock: Box::new(clock),
            pool,
        })
    }

    pub fn rules(&self) -> &SiteRules {
        &self.rules
    }

    pub fn parser(&self) -> EventRecordParser<'_> {
        EventRecordParser::new(&self.rules, self.clock.as_ref())
    }

    /// Parse every row of one page. Row failures are logged and collected,
    /// never propagated.
    pub fn process_page(&self, html: &str, page_url: &str) -> PageReport {
        let (fragments, next_page) = split_listing(html, page_url, &self.rules);
        let parser = self.parser();

        let results: Vec<_> = self.pool.install(|| {
            fragments
                .par_iter()
                .enumerate()
                .map(|(index, fragment)| (index, parser.parse_html(fragment, page_url)))
                .collect()
        });

        let mut records = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (index, result) in results {
            match result {
                Ok(record) => records.push(record),
                Err(error) => {
                    civic_warn!("Skipping row {} on {}: {}", index, page_url, error);
                    failures.push(FragmentFailure { index, error });
                }
            }
        }

        civic_info!(
            "Parsed {} of {} rows on {}",
            records.len(),
            fragments.len(),
            page_url
        );
        PageReport {
            page_url: page_url.to_string(),
            records,
            failures,
            next_page,
        }
    }

    /// Follow next-page links from `start_url`, at most `max_pages` pages.
    ///
    /// Pages are fetched one after another since each link comes from the
    /// page before it. A page already visited ends the crawl.
    pub fn crawl(
        &self,
        fetcher: &dyn PageFetcher,
        start_url: &str,
        max_pages: usize,
    ) -> Result<Vec<PageReport>, FetchError> {
        let mut reports = Vec::new();
        let mut visited = BTreeSet::new();
        let mut next = Some(start_url.to_string());

        while let Some(url) = next.take() {
            if reports.len() >= max_pages {
                civic_debug!("Page limit {} reached before {}", max_pages, url);
                break;
            }
            if !visited.insert(url.clone()) {
                civic_debug!("Pagination loops back to {}", url);
                break;
            }
            let html = fetcher.fetch(&url)?;
            let report = self.process_page(&html, &url);
            next = report.next_page.clone();
            reports.push(report);
        }
        Ok(reports)
    }
}
