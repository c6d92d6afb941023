//! URL prioritization, deduplication and route labeling
//!
//! The last transform before emission. Per channel, candidates are stably
//! sorted by IP-version preference, filtered against the blacklist and the
//! run-wide emitted-URL set, then labeled with a version tag and, when a
//! channel keeps more than one route, a 1-based route index.
//!
//! The emitted-URL set spans the whole run: a URL that already appeared
//! under any earlier channel is dropped, so no URL string ever occurs
//! twice anywhere in the output.

use std::collections::HashSet;

use regex::Regex;

use crate::config::IpVersionPriority;
use crate::models::{MatchedCategory, ResolvedCategory, ResolvedChannel};

const IPV6_TAG: &str = "LR•IPV6";
const IPV4_TAG: &str = "LR•IPV4";

/// Run-scoped accumulator of URL strings already placed in the output.
///
/// Owned by the caller and threaded through every `resolve` call; this is
/// deliberately not process-global state.
#[derive(Debug, Default)]
pub struct EmittedUrls(HashSet<String>);

impl EmittedUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.contains(url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct Prioritizer {
    priority: IpVersionPriority,
    blacklist: Vec<String>,
    ipv6: Regex,
}

impl Prioritizer {
    pub fn new(priority: IpVersionPriority, blacklist: Vec<String>) -> Self {
        Self {
            priority,
            blacklist,
            ipv6: Regex::new(r"^http://\[[0-9a-fA-F:]+\]").expect("static regex"),
        }
    }

    /// An address counts as IPv6 only in the literal-bracket URL form;
    /// everything else is treated as IPv4/other.
    pub fn is_ipv6(&self, url: &str) -> bool {
        self.ipv6.is_match(url)
    }

    /// Sort, filter and label one channel's candidates.
    ///
    /// Returns the final labeled URL list, possibly empty. Accepted URLs
    /// are recorded in `emitted` under their unlabeled form.
    pub fn resolve(&self, candidates: &[String], emitted: &mut EmittedUrls) -> Vec<String> {
        let mut sorted: Vec<&String> = candidates.iter().collect();
        // Stable sort: ties keep discovery order.
        match self.priority {
            IpVersionPriority::Ipv6 => sorted.sort_by_key(|url| !self.is_ipv6(url)),
            IpVersionPriority::Ipv4 => sorted.sort_by_key(|url| self.is_ipv6(url)),
        }

        let mut kept: Vec<String> = Vec::new();
        for url in sorted {
            if url.is_empty()
                || emitted.contains(url)
                || self.blacklist.iter().any(|entry| url.contains(entry))
            {
                continue;
            }
            emitted.0.insert(url.clone());
            kept.push(url.clone());
        }

        let total = kept.len();
        kept.iter()
            .enumerate()
            .map(|(i, url)| self.label(url, i + 1, total))
            .collect()
    }

    /// Resolve a whole matched run, dropping channels that keep no URLs.
    /// Categories are kept even when empty; the emitter still writes their
    /// headers.
    pub fn resolve_categories(
        &self,
        matched: &[MatchedCategory],
        emitted: &mut EmittedUrls,
    ) -> Vec<ResolvedCategory> {
        matched
            .iter()
            .map(|category| ResolvedCategory {
                name: category.name.clone(),
                channels: category
                    .channels
                    .iter()
                    .filter_map(|channel| {
                        let urls = self.resolve(&channel.candidates, emitted);
                        if urls.is_empty() {
                            None
                        } else {
                            Some(ResolvedChannel {
                                name: channel.name.clone(),
                                urls,
                            })
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    /// Replace any existing `$` marker with a fresh version tag, indexed
    /// when the channel has more than one surviving route.
    fn label(&self, url: &str, index: usize, total: usize) -> String {
        let version = if self.is_ipv6(url) { IPV6_TAG } else { IPV4_TAG };
        let base = url.split('$').next().unwrap_or(url);
        if total == 1 {
            format!("{base}${version}")
        } else {
            format!("{base}${version}『线路{index}』")
        }
    }
}
