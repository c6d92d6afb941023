//! Cross-source merging
//!
//! Folds per-source channel indexes into one aggregate in declared source
//! order. Nothing is deduplicated here: the prioritizer depends on seeing
//! every observation in source-then-discovery order for stable
//! tie-breaking, so the merge is append-only.

use crate::models::ChannelIndex;

#[derive(Default)]
pub struct ChannelMerger {
    aggregate: ChannelIndex,
}

impl ChannelMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one source's index. Call in declared source order.
    pub fn merge(&mut self, source_index: ChannelIndex) {
        self.aggregate.extend(source_index);
    }

    pub fn into_index(self) -> ChannelIndex {
        self.aggregate
    }
}
