//! Pipeline orchestration
//!
//! Drives one run end to end: fetch every configured source, classify and
//! parse it, merge the results into the aggregate, resolve the template
//! against it and prioritize the resolved URLs. Each source is processed
//! behind an isolation boundary: a failed fetch or parse is recorded in
//! that source's report and never aborts the remaining sources.
//!
//! Fetches run concurrently but `buffered` yields results in input order,
//! so the merge always sees sources in their declared order. All later
//! stages are sequential, single-owner transforms.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::SourceError;
use crate::models::{
    ChannelIndex, ChannelTemplate, ResolvedCategory, SourceFormat, SourceOutcome, SourceReport,
};
use crate::sources::{detect_format, M3uParser, SourceFetcher, TextHeuristicParser};

pub mod matcher;
pub mod merge;
pub mod prioritize;

pub use merge::ChannelMerger;
pub use prioritize::{EmittedUrls, Prioritizer};

pub struct PipelineResult {
    pub resolved: Vec<ResolvedCategory>,
    pub reports: Vec<SourceReport>,
}

impl PipelineResult {
    pub fn resolved_channel_count(&self) -> usize {
        self.resolved.iter().map(|c| c.channels.len()).sum()
    }
}

pub struct Aggregator {
    config: Config,
    m3u: M3uParser,
    txt: TextHeuristicParser,
}

impl Aggregator {
    pub fn new(config: Config) -> Self {
        let txt = TextHeuristicParser::new(config.category_keywords.clone());
        Self {
            config,
            m3u: M3uParser::new(),
            txt,
        }
    }

    /// Run the full pipeline against an already-loaded template.
    pub async fn run(
        &self,
        template: &ChannelTemplate,
        fetcher: &dyn SourceFetcher,
    ) -> PipelineResult {
        let (aggregate, reports) = self.collect(fetcher).await;
        info!(
            "Aggregate index: {} categories, {} channel entries",
            aggregate.category_count(),
            aggregate.channel_count()
        );

        let matched = matcher::match_template(template, &aggregate);
        let prioritizer = Prioritizer::new(
            self.config.ip_version_priority,
            self.config.url_blacklist.clone(),
        );
        let mut emitted = EmittedUrls::new();
        let resolved = prioritizer.resolve_categories(&matched, &mut emitted);
        info!("Resolved {} unique URLs for the template", emitted.len());

        PipelineResult { resolved, reports }
    }

    /// Fetch, classify, parse and merge every configured source.
    pub async fn collect(&self, fetcher: &dyn SourceFetcher) -> (ChannelIndex, Vec<SourceReport>) {
        let concurrency = self.config.fetch.concurrency.max(1);
        let results: Vec<(String, Result<String, SourceError>)> =
            stream::iter(self.config.source_urls.iter().cloned())
                .map(|url| async move {
                    let result = fetcher.fetch(&url).await;
                    (url, result)
                })
                .buffered(concurrency)
                .collect()
                .await;

        let mut merger = ChannelMerger::new();
        let mut reports = Vec::with_capacity(results.len());

        for (url, result) in results {
            match result {
                Ok(text) => {
                    let (format, index) = self.parse_source(&url, &text);
                    reports.push(SourceReport {
                        url,
                        outcome: SourceOutcome::Parsed {
                            format,
                            categories: index.category_count(),
                            channels: index.channel_count(),
                        },
                    });
                    merger.merge(index);
                }
                Err(error) => {
                    warn!("Source failed: {error}");
                    reports.push(SourceReport {
                        url,
                        outcome: SourceOutcome::Failed {
                            error: error.to_string(),
                        },
                    });
                }
            }
        }

        (merger.into_index(), reports)
    }

    fn parse_source(&self, url: &str, text: &str) -> (SourceFormat, ChannelIndex) {
        let text = text.trim();
        let format = detect_format(text);
        let line_count = text.lines().count();
        info!("Source {url}: detected {format} format, {line_count} lines");

        let index = match format {
            SourceFormat::M3u => self.m3u.parse(text),
            SourceFormat::Text => self.txt.parse(text, url),
        };

        if index.is_empty() {
            warn!("Source {url}: parsed zero channels");
            for (i, line) in text.lines().take(10).enumerate() {
                warn!("Source {url}: line {}: {line}", i + 1);
            }
        } else {
            info!(
                "Source {url}: {} categories, {} channels",
                index.category_count(),
                index.channel_count()
            );
            for category in index.categories() {
                debug!(
                    "Source {url}: category '{category}': {} channels",
                    index.entries(category).len()
                );
            }
        }

        (format, index)
    }
}
