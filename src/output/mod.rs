//! Playlist serialization
//!
//! Writes the resolved run into the two output documents: `live.m3u` for
//! players that speak M3U (EPG header, one `#EXTINF` + URL pair per
//! route) and `live.txt` mirroring the same content as `category,#genre#`
//! headers with `name,url` lines. Announcements come first, then the
//! template categories in template order. A category header is always
//! written even when no channel under it survived; a channel with no
//! surviving URLs is simply absent.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::{AnnouncementGroup, Config};
use crate::errors::AppError;
use crate::models::ResolvedCategory;

pub struct PlaylistEmitter {
    epg_urls: Vec<String>,
    announcements: Vec<AnnouncementGroup>,
    logo_url_template: String,
    m3u_path: PathBuf,
    txt_path: PathBuf,
}

impl PlaylistEmitter {
    pub fn new(config: &Config) -> Self {
        Self {
            epg_urls: config.epg_urls.clone(),
            announcements: config.announcements.clone(),
            logo_url_template: config.logo_url_template.clone(),
            m3u_path: config.output.m3u_path.clone(),
            txt_path: config.output.txt_path.clone(),
        }
    }

    /// Render and write both outputs. Write failures are fatal.
    pub fn write(&self, resolved: &[ResolvedCategory]) -> Result<(), AppError> {
        let run_date = Local::now().format("%Y-%m-%d").to_string();
        write_file(&self.m3u_path, &self.render_m3u(resolved, &run_date))?;
        write_file(&self.txt_path, &self.render_txt(resolved, &run_date))?;
        Ok(())
    }

    /// Render the M3U document. `run_date` fills unset announcement names.
    pub fn render_m3u(&self, resolved: &[ResolvedCategory], run_date: &str) -> String {
        let epg_list = self
            .epg_urls
            .iter()
            .map(|url| format!("\"{url}\""))
            .collect::<Vec<_>>()
            .join(",");
        let mut out = format!("#EXTM3U x-tvg-url={epg_list}\n");

        for group in &self.announcements {
            for entry in &group.entries {
                let name = entry.name.as_deref().unwrap_or(run_date);
                out.push_str(&format!(
                    "#EXTINF:-1 tvg-id=\"1\" tvg-name=\"{name}\" tvg-logo=\"{logo}\" group-title=\"{group}\",{name}\n",
                    logo = entry.logo,
                    group = group.channel,
                ));
                out.push_str(&entry.url);
                out.push('\n');
            }
        }

        for category in resolved {
            for channel in &category.channels {
                let logo = self.logo_url_template.replace("{name}", &channel.name);
                for (index, url) in channel.urls.iter().enumerate() {
                    out.push_str(&format!(
                        "#EXTINF:-1 tvg-id=\"{id}\" tvg-name=\"{name}\" tvg-logo=\"{logo}\" group-title=\"{group}\",{name}\n",
                        id = index + 1,
                        name = channel.name,
                        group = category.name,
                    ));
                    out.push_str(url);
                    out.push('\n');
                }
            }
        }

        out
    }

    /// Render the flat-text document mirroring the M3U content.
    pub fn render_txt(&self, resolved: &[ResolvedCategory], run_date: &str) -> String {
        let mut out = String::new();

        for group in &self.announcements {
            out.push_str(&format!("{},#genre#\n", group.channel));
            for entry in &group.entries {
                let name = entry.name.as_deref().unwrap_or(run_date);
                out.push_str(&format!("{name},{}\n", entry.url));
            }
        }

        for category in resolved {
            out.push_str(&format!("{},#genre#\n", category.name));
            for channel in &category.channels {
                for url in &channel.urls {
                    out.push_str(&format!("{},{url}\n", channel.name));
                }
            }
        }

        out.push('\n');
        out
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::output(path.display().to_string(), e))?;
        }
    }
    std::fs::write(path, contents).map_err(|e| AppError::output(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Announcement;
    use crate::models::ResolvedChannel;

    fn emitter(announcements: Vec<AnnouncementGroup>) -> PlaylistEmitter {
        PlaylistEmitter {
            epg_urls: vec![
                "https://epg.example/a.xml".to_string(),
                "https://epg.example/b.xml".to_string(),
            ],
            announcements,
            logo_url_template: "https://logos.example/{name}.png".to_string(),
            m3u_path: PathBuf::from("live.m3u"),
            txt_path: PathBuf::from("live.txt"),
        }
    }

    fn resolved_fixture() -> Vec<ResolvedCategory> {
        vec![
            ResolvedCategory {
                name: "央视频道".to_string(),
                channels: vec![ResolvedChannel {
                    name: "CCTV1".to_string(),
                    urls: vec![
                        "http://[2001:db8::1]/b$LR•IPV6『线路1』".to_string(),
                        "http://1.2.3.4/a$LR•IPV4『线路2』".to_string(),
                    ],
                }],
            },
            ResolvedCategory {
                name: "空分类".to_string(),
                channels: Vec::new(),
            },
        ]
    }

    #[test]
    fn m3u_header_joins_quoted_epg_urls() {
        let m3u = emitter(Vec::new()).render_m3u(&[], "2024-01-01");
        assert!(m3u.starts_with(
            "#EXTM3U x-tvg-url=\"https://epg.example/a.xml\",\"https://epg.example/b.xml\"\n"
        ));
    }

    #[test]
    fn channel_emits_one_extinf_per_route_with_route_index_ids() {
        let m3u = emitter(Vec::new()).render_m3u(&resolved_fixture(), "2024-01-01");
        assert!(m3u.contains(
            "#EXTINF:-1 tvg-id=\"1\" tvg-name=\"CCTV1\" tvg-logo=\"https://logos.example/CCTV1.png\" group-title=\"央视频道\",CCTV1\nhttp://[2001:db8::1]/b$LR•IPV6『线路1』\n"
        ));
        assert!(m3u.contains("tvg-id=\"2\""));
    }

    #[test]
    fn empty_category_keeps_its_txt_header() {
        let txt = emitter(Vec::new()).render_txt(&resolved_fixture(), "2024-01-01");
        assert!(txt.contains("空分类,#genre#\n"));
        // But no channel lines follow it.
        assert!(txt.ends_with("空分类,#genre#\n\n"));
    }

    #[test]
    fn announcement_name_defaults_to_run_date() {
        let groups = vec![AnnouncementGroup {
            channel: "公告".to_string(),
            entries: vec![Announcement {
                name: None,
                url: "http://news.example/a.mp4".to_string(),
                logo: "http://news.example/logo.jpg".to_string(),
            }],
        }];
        let e = emitter(groups);

        let m3u = e.render_m3u(&[], "2024-06-01");
        assert!(m3u.contains("tvg-name=\"2024-06-01\""));
        let txt = e.render_txt(&[], "2024-06-01");
        assert!(txt.contains("公告,#genre#\n2024-06-01,http://news.example/a.mp4\n"));
    }

    #[test]
    fn announcements_precede_template_categories() {
        let groups = vec![AnnouncementGroup {
            channel: "公告".to_string(),
            entries: vec![Announcement {
                name: Some("请阅读".to_string()),
                url: "http://news.example/a.mp4".to_string(),
                logo: "http://news.example/logo.jpg".to_string(),
            }],
        }];
        let txt = emitter(groups).render_txt(&resolved_fixture(), "2024-01-01");
        let announcement_pos = txt.find("公告,#genre#").unwrap();
        let category_pos = txt.find("央视频道,#genre#").unwrap();
        assert!(announcement_pos < category_pos);
    }

    #[test]
    fn rendering_is_idempotent() {
        let e = emitter(Vec::new());
        let fixture = resolved_fixture();
        assert_eq!(
            e.render_m3u(&fixture, "2024-01-01"),
            e.render_m3u(&fixture, "2024-01-01")
        );
        assert_eq!(
            e.render_txt(&fixture, "2024-01-01"),
            e.render_txt(&fixture, "2024-01-01")
        );
    }

    #[test]
    fn write_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = emitter(Vec::new());
        e.m3u_path = dir.path().join("live.m3u");
        e.txt_path = dir.path().join("live.txt");

        e.write(&resolved_fixture()).unwrap();
        let m3u = std::fs::read_to_string(&e.m3u_path).unwrap();
        let txt = std::fs::read_to_string(&e.txt_path).unwrap();
        assert!(m3u.starts_with("#EXTM3U"));
        assert!(txt.contains("CCTV1,"));
    }
}
