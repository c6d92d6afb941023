//! Template-driven channel resolution
//!
//! For each template channel, collects every URL the aggregate holds under
//! that exact channel name, searching across *all* source categories, not
//! just the one sharing the template category's name. Sources file the
//! same channel under wildly different category names, so narrowing the
//! search to the template category would silently lose routes.

use crate::models::{ChannelIndex, ChannelTemplate, MatchedCategory, MatchedChannel};

/// Resolve every template channel against the aggregate.
///
/// Matching is exact and case-sensitive; candidate order is aggregate
/// discovery order. Channels with no match keep an empty candidate list so
/// the template structure stays intact for the emitter.
pub fn match_template(template: &ChannelTemplate, aggregate: &ChannelIndex) -> Vec<MatchedCategory> {
    template
        .categories
        .iter()
        .map(|category| MatchedCategory {
            name: category.name.clone(),
            channels: category
                .channels
                .iter()
                .map(|channel_name| MatchedChannel {
                    name: channel_name.clone(),
                    candidates: aggregate
                        .iter()
                        .filter(|(_, entry)| entry.name == *channel_name)
                        .map(|(_, entry)| entry.url.clone())
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
