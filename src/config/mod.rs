use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// IP-version ordering preference for a channel's candidate URLs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IpVersionPriority {
    Ipv6,
    Ipv4,
}

// Plain values stay ahead of the table-valued fields so the default
// config serializes cleanly to TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ip_version_priority: IpVersionPriority,
    /// Channel template path.
    #[serde(default = "default_template_file")]
    pub template_file: PathBuf,
    /// Logo URL pattern with a `{name}` placeholder, filled per channel.
    #[serde(default = "default_logo_url_template")]
    pub logo_url_template: String,
    /// Source documents, fetched and merged in this order.
    pub source_urls: Vec<String>,
    /// A URL containing any of these substrings is never emitted.
    #[serde(default)]
    pub url_blacklist: Vec<String>,
    /// EPG URLs for the `x-tvg-url` playlist header, in this order.
    #[serde(default)]
    pub epg_urls: Vec<String>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Ordered keyword table used to pick a category for flat-text entries
    /// seen before any category header. First match wins; not exhaustive.
    #[serde(default = "default_category_keywords")]
    pub category_keywords: Vec<CategoryKeyword>,
    /// Announcement groups written ahead of the template categories.
    #[serde(default)]
    pub announcements: Vec<AnnouncementGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncementGroup {
    /// Display category the group's entries are filed under.
    pub channel: String,
    pub entries: Vec<Announcement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    /// Unset names resolve to the run date at serialization time.
    pub name: Option<String>,
    pub url: String,
    pub logo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryKeyword {
    pub keyword: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Concurrent fetches in flight; results are re-sequenced into declared
    /// source order before merging regardless of this value.
    pub concurrency: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub m3u_path: PathBuf,
    pub txt_path: PathBuf,
}

fn default_template_file() -> PathBuf {
    PathBuf::from("demo.txt")
}

fn default_logo_url_template() -> String {
    "https://gcore.jsdelivr.net/gh/yuanzl77/TVlogo@master/png/{name}.png".to_string()
}

fn default_category_keywords() -> Vec<CategoryKeyword> {
    let table = [
        ("CCTV", "央视频道"),
        ("卫视", "卫视频道"),
        ("4K", "4K频道"),
        ("8K", "8K频道"),
    ];
    table
        .into_iter()
        .map(|(keyword, category)| CategoryKeyword {
            keyword: keyword.to_string(),
            category: category.to_string(),
        })
        .collect()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            concurrency: 4,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            m3u_path: PathBuf::from("live.m3u"),
            txt_path: PathBuf::from("live.txt"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip_version_priority: IpVersionPriority::Ipv6,
            source_urls: vec![
                "https://mirror.ghproxy.com/https://raw.githubusercontent.com/joevess/IPTV/main/home.m3u8".to_string(),
                "https://wzsvip.github.io/ipv6.m3u".to_string(),
                "https://wzsvip.github.io/ipv4.m3u".to_string(),
                "https://live.iptv365.org/live.txt".to_string(),
                "https://live.iptv365.org/live.m3u".to_string(),
                "http://aktv.top/live.m3u".to_string(),
            ],
            url_blacklist: vec![
                "epdg.pw/stream/".to_string(),
                "103.40.13.71:12390".to_string(),
                "[2409:8087:1a01:df::4077]/PLTV/".to_string(),
                "yinhe.live_hls.zte.com".to_string(),
                "histar.zapi.us.kg".to_string(),
                "www.tfiplaytv.vip".to_string(),
                "dp.sxtv.top".to_string(),
                "live.goodiptv.club".to_string(),
                "iptv.luas.edu.cn".to_string(),
            ],
            epg_urls: vec![
                "https://live.fanmingming.com/e.xml".to_string(),
                "http://epg.51zmt.top:8000/e.xml".to_string(),
                "http://epg.aptvapp.com/xml".to_string(),
                "https://epg.pw/xmltv/epg_CN.xml".to_string(),
                "https://epg.pw/xmltv/epg_HK.xml".to_string(),
                "https://epg.pw/xmltv/epg_TW.xml".to_string(),
            ],
            announcements: vec![AnnouncementGroup {
                channel: "公告".to_string(),
                entries: vec![Announcement {
                    name: None,
                    url: "https://gitlab.com/lr77/IPTV/-/raw/main/%E8%B5%B7%E9%A3%8E%E4%BA%86.mp4"
                        .to_string(),
                    logo: "http://175.178.251.183:6689/LR.jpg".to_string(),
                }],
            }],
            category_keywords: default_category_keywords(),
            logo_url_template: default_logo_url_template(),
            template_file: default_template_file(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, writing defaults there on
    /// first run (same bootstrap behavior as the config file being absent).
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| AppError::configuration(format!("{}: {}", path.display(), e)))?;
            toml::from_str(&contents)
                .map_err(|e| AppError::configuration(format!("{}: {}", path.display(), e)))
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)
                .map_err(|e| AppError::configuration(e.to_string()))?;
            std::fs::write(path, contents)
                .map_err(|e| AppError::configuration(format!("{}: {}", path.display(), e)))?;
            Ok(default_config)
        }
    }
}
