//! Shared data model for the aggregation pipeline
//!
//! Every stage owns its output exclusively: parsers produce a per-source
//! `ChannelIndex`, the merger folds those into one aggregate `ChannelIndex`,
//! the matcher produces `MatchedCategory` lists in template order, and the
//! prioritizer turns those into `ResolvedCategory` lists ready for emission.
//! Nothing here persists across runs.

use std::collections::HashMap;

/// Ordered category/channel-name skeleton defining the output structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTemplate {
    pub categories: Vec<TemplateCategory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCategory {
    pub name: String,
    pub channels: Vec<String>,
}

impl ChannelTemplate {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.categories.iter().map(|c| c.channels.len()).sum()
    }
}

/// One `(name, url)` observation filed under a category.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEntry {
    pub name: String,
    pub url: String,
}

/// Ordered index of categories to channel entries.
///
/// Used both for a single source's parse result and for the cross-source
/// aggregate. Category insertion order and per-category entry order are
/// preserved; duplicates are retained. Later stages rely on this ordering
/// for stable tie-breaking, so it must never be re-sorted here.
#[derive(Debug, Clone, Default)]
pub struct ChannelIndex {
    order: Vec<String>,
    entries: HashMap<String, Vec<ChannelEntry>>,
}

impl ChannelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a category, resetting its entry list if it already exists.
    ///
    /// This is the flat-text opener semantic: a repeated category header
    /// within one source discards what was collected under it before.
    pub fn open_category(&mut self, name: &str) {
        if let Some(existing) = self.entries.get_mut(name) {
            existing.clear();
        } else {
            self.order.push(name.to_string());
            self.entries.insert(name.to_string(), Vec::new());
        }
    }

    /// Ensure a category exists without touching any entries it already has.
    ///
    /// This is the M3U opener semantic.
    pub fn ensure_category(&mut self, name: &str) {
        if !self.entries.contains_key(name) {
            self.order.push(name.to_string());
            self.entries.insert(name.to_string(), Vec::new());
        }
    }

    /// Append an entry to a category, creating the category if needed.
    pub fn push(&mut self, category: &str, name: String, url: String) {
        self.ensure_category(category);
        self.entries
            .get_mut(category)
            .expect("category just ensured")
            .push(ChannelEntry { name, url });
    }

    /// Fold another index into this one, appending entries in the other's
    /// category-then-discovery order. Never deduplicates.
    pub fn extend(&mut self, other: ChannelIndex) {
        for category in other.order {
            let incoming = other
                .entries
                .get(&category)
                .map(|e| e.as_slice())
                .unwrap_or_default();
            self.ensure_category(&category);
            self.entries
                .get_mut(&category)
                .expect("category just ensured")
                .extend_from_slice(incoming);
        }
    }

    /// Categories in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries for one category, in discovery order.
    pub fn entries(&self, category: &str) -> &[ChannelEntry] {
        self.entries
            .get(category)
            .map(|e| e.as_slice())
            .unwrap_or_default()
    }

    /// All entries in aggregate discovery order (category insertion order,
    /// then per-category entry order).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelEntry)> {
        self.order.iter().flat_map(move |category| {
            self.entries(category)
                .iter()
                .map(move |entry| (category.as_str(), entry))
        })
    }

    pub fn category_count(&self) -> usize {
        self.order.len()
    }

    pub fn channel_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.channel_count() == 0
    }
}

/// Format classification for one source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    M3u,
    Text,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::M3u => write!(f, "m3u"),
            Self::Text => write!(f, "txt"),
        }
    }
}

/// Per-source processing outcome, collected into the run report.
#[derive(Debug)]
pub struct SourceReport {
    pub url: String,
    pub outcome: SourceOutcome,
}

#[derive(Debug)]
pub enum SourceOutcome {
    Parsed {
        format: SourceFormat,
        categories: usize,
        channels: usize,
    },
    Failed {
        error: String,
    },
}

impl SourceReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Parsed { .. })
    }
}

/// A template channel with the candidate URLs found anywhere in the
/// aggregate, in aggregate discovery order. Duplicates still present.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedChannel {
    pub name: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedCategory {
    pub name: String,
    pub channels: Vec<MatchedChannel>,
}

/// A channel after filtering, dedup, sort and route labeling. The URL list
/// is final: ordered, unique run-wide, and already carries route labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChannel {
    pub name: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCategory {
    pub name: String,
    pub channels: Vec<ResolvedChannel>,
}
