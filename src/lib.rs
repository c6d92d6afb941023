//! IPTV playlist aggregation library
//!
//! Aggregates heterogeneous channel-list sources (M3U playlists and
//! free-form text lists) into one canonical, deduplicated playlist matching
//! a fixed channel template. The pipeline: fetch each source, detect its
//! format, parse it tolerantly, merge all observations into an aggregate
//! index, resolve the template against it, then prioritize, dedup and
//! label each channel's URLs before emitting `live.m3u` and `live.txt`.

pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod template;
