//! Job-listing retrieval and extraction from search-result text.
//!
//! Search results are unstructured prose, so extraction is heuristic by
//! nature: three independent scans (titles, locations, URLs) paired up by
//! position. The pairing can misalign when one heuristic finds fewer items
//! than another; the extraction strategy trait exists so a stricter parser
//! can replace this one without touching retrieval.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use regex::{Regex, RegexBuilder};
use tracing::error;

use crate::directory::DirectoryEntry;
use crate::models::jobs::JobRecord;
use crate::pipeline::outcome::StageOutcome;
use crate::policy::SOURCE_ACT_MEMBERS;
use crate::tools::JobsSearchTool;

/// Bounded fan-out for per-company searches; matches the number of
/// top-ranked companies.
const MAX_CONCURRENT_SEARCHES: usize = 5;

pub const FALLBACK_TITLE: &str = "Clean Energy Professional";
const DEFAULT_LOCATION: &str = "Massachusetts";

// Titles shorter or longer than this are scan noise, not job titles.
const TITLE_MIN_CHARS: usize = 5;
const TITLE_MAX_CHARS: usize = 100;

/// Turns one company's search-result text into job records.
pub trait ListingExtractionStrategy: Send + Sync {
    fn extract(&self, text: &str, entry: &DirectoryEntry) -> Vec<JobRecord>;
}

/// Pattern-based extraction over the search-result text.
pub struct RegexListingExtractor {
    title: Regex,
    location: Regex,
    url: Regex,
}

impl RegexListingExtractor {
    pub fn new() -> Self {
        Self {
            title: Regex::new(
                r"(?:^|\n)([A-Z][A-Za-z\s\-\&]+?)(?:\s+at\s+|\s*\-\s*|\s*:\s*|\s*,\s*|\s+in\s+)",
            )
            .expect("title pattern must compile"),
            location: RegexBuilder::new(
                r"(?:location|in|at)\s+([A-Za-z\s\-\,]+?(?:MA|Massachusetts))",
            )
            .case_insensitive(true)
            .build()
            .expect("location pattern must compile"),
            url: Regex::new(r#"https?://[^\s)"]+"#).expect("url pattern must compile"),
        }
    }
}

impl Default for RegexListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingExtractionStrategy for RegexListingExtractor {
    fn extract(&self, text: &str, entry: &DirectoryEntry) -> Vec<JobRecord> {
        let titles: Vec<&str> = self
            .title
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str())
            .collect();
        let locations: Vec<&str> = self
            .location
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str())
            .collect();
        let urls: Vec<&str> = self.url.find_iter(text).map(|m| m.as_str()).collect();

        let mut jobs = Vec::new();
        for (i, raw_title) in titles.iter().enumerate() {
            let title = raw_title.trim();
            let len = title.chars().count();
            if len <= TITLE_MIN_CHARS || len >= TITLE_MAX_CHARS {
                continue;
            }
            // Locations and URLs pair with the title at the same scan
            // position; a shorter list falls back to defaults. The index
            // counts every scanned title, including filtered ones.
            jobs.push(JobRecord {
                title: title.to_string(),
                company: entry.name.to_string(),
                location: locations
                    .get(i)
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
                url: urls.get(i).map(|u| u.to_string()).unwrap_or_default(),
                source: SOURCE_ACT_MEMBERS.to_string(),
            });
        }

        if jobs.is_empty() {
            jobs.push(JobRecord {
                title: FALLBACK_TITLE.to_string(),
                company: entry.name.to_string(),
                location: DEFAULT_LOCATION.to_string(),
                url: entry.careers_url.to_string(),
                source: SOURCE_ACT_MEMBERS.to_string(),
            });
        }
        jobs
    }
}

/// Fans job searches out across the top-ranked companies and collects the
/// extracted records. A failed company is skipped, never fatal.
pub struct OpportunityRetriever {
    tool: Arc<JobsSearchTool>,
    strategy: Arc<dyn ListingExtractionStrategy>,
}

impl OpportunityRetriever {
    pub fn new(tool: Arc<JobsSearchTool>, strategy: Arc<dyn ListingExtractionStrategy>) -> Self {
        Self { tool, strategy }
    }

    pub async fn collect(&self, entries: &[&DirectoryEntry]) -> StageOutcome<Vec<JobRecord>> {
        let searches = entries.iter().copied().map(|entry| {
            let tool = Arc::clone(&self.tool);
            async move {
                match tool.run(entry.name).await {
                    Ok(text) => (entry, Some(text)),
                    Err(e) => {
                        error!("Error retrieving jobs from {}: {e}", entry.name);
                        (entry, None)
                    }
                }
            }
        });
        // buffered() preserves input order, so records come back in rank order.
        let results: Vec<(&DirectoryEntry, Option<String>)> = stream::iter(searches)
            .buffered(MAX_CONCURRENT_SEARCHES)
            .collect()
            .await;

        let mut jobs = Vec::new();
        let mut skipped = Vec::new();
        for (entry, text) in results {
            match text {
                Some(text) => jobs.extend(self.strategy.extract(&text, entry)),
                None => skipped.push(entry.name.to_string()),
            }
        }
        StageOutcome::partial(jobs, skipped)
    }
}
