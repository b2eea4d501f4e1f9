//! Site lifecycle: URL normalization, record construction, screenshot URL
//! derivation, and import/export parsing.

use crate::error::{MonitorError, Result};
use crate::history;
use crate::types::{ExportRecord, Site, SiteStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Normalize raw user input into a canonical absolute URL.
///
/// Schemeless input gets `https://` prefixed before parsing, so `example.com`
/// and `https://example.com` normalize identically. Parse failure surfaces
/// synchronously as [`MonitorError::InvalidUrl`].
pub fn normalize_url(raw: &str) -> Result<String> {
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let parsed = Url::parse(&candidate).map_err(|_| MonitorError::InvalidUrl(raw.into()))?;
    Ok(parsed.to_string())
}

/// Human-friendly default name: the host without a leading `www.`, falling
/// back to the raw input when it does not parse.
pub fn derive_name(url: &str) -> String {
    match Url::parse(url) {
        Ok(u) => match u.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// Opaque unique id: millisecond timestamp plus a high-resolution-clock
/// entropy suffix.
fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("{}{:08x}", Utc::now().timestamp_millis(), nanos)
}

/// Build a fresh site record in the `not-checked` state. `url` must already
/// be normalized.
pub fn new_site(url: &str, name: Option<&str>, tags: Vec<String>, description: String) -> Site {
    let name = match name {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => derive_name(url),
    };
    Site {
        id: generate_id(),
        url: url.to_string(),
        name,
        tags,
        description,
        status: SiteStatus::NotChecked,
        last_checked: None,
        response_time_ms: None,
        error_message: None,
        title: String::new(),
        favicon: None,
        screenshot_url: None,
        ssl: false,
        social_links: Vec::new(),
        check_history: Vec::new(),
        ai_analysis: None,
        added_at: Utc::now(),
    }
}

/// Derive the mShots screenshot URL for a site. Pure transform, never fails;
/// callers treat `None` as "no screenshot available".
pub fn screenshot_url(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    Some(format!(
        "https://s0.wp.com/mshots/v1/{}?w=800",
        crate::tools::fetch::encode_component(url)
    ))
}

pub fn export_record(site: &Site) -> ExportRecord {
    ExportRecord {
        url: site.url.clone(),
        name: site.name.clone(),
        tags: site.tags.clone(),
        description: site.description.clone(),
        status: site.status,
        last_checked: site.last_checked,
        response_time_ms: site.response_time_ms,
        availability: history::availability(site),
    }
}

/* ---------- import parsing ---------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
    Text,
}

impl ImportFormat {
    /// Guess from a file extension; anything unrecognized is plain text
    /// (one URL per line).
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("csv") => ImportFormat::Csv,
            Some("json") => ImportFormat::Json,
            _ => ImportFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportRecord {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Parse import content into candidate records. Rows without a URL are
/// skipped; URL validation and deduplication happen at add time.
pub fn parse_import(content: &str, format: ImportFormat) -> Result<Vec<ImportRecord>> {
    match format {
        ImportFormat::Csv => Ok(parse_csv(content)),
        ImportFormat::Json => Ok(serde_json::from_str(content)?),
        ImportFormat::Text => Ok(parse_text(content)),
    }
}

/// `url,name,tags,description` with a header row; tags are `;`-separated
/// within their cell.
fn parse_csv(content: &str) -> Vec<ImportRecord> {
    content
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut cells = line.split(',');
            let url = cells.next()?.trim();
            if url.is_empty() {
                return None;
            }
            let name = cells.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
            let tags = cells
                .next()
                .map(|s| {
                    s.split(';')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let description = cells.next().map(|s| s.trim().to_string()).unwrap_or_default();
            Some(ImportRecord {
                url: url.to_string(),
                name,
                tags,
                description,
            })
        })
        .collect()
}

fn parse_text(content: &str) -> Vec<ImportRecord> {
    content
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|url| ImportRecord {
            url: url.to_string(),
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefixes_https_for_schemeless_input() {
        assert_eq!(
            normalize_url("example.com").unwrap(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_url("http://example.com").unwrap(),
            "http://example.com/"
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(
            normalize_url("ht tp://nope"),
            Err(MonitorError::InvalidUrl(_))
        ));
    }

    #[test]
    fn derive_name_strips_www() {
        assert_eq!(derive_name("https://www.example.com/about"), "example.com");
        assert_eq!(derive_name("https://blog.example.com/"), "blog.example.com");
    }

    #[test]
    fn new_site_starts_unchecked() {
        let s = new_site("https://example.com/", None, vec![], String::new());
        assert_eq!(s.status, SiteStatus::NotChecked);
        assert_eq!(s.name, "example.com");
        assert!(s.check_history.is_empty());
        assert!(s.last_checked.is_none());
    }

    #[test]
    fn ids_are_unique_within_a_burst() {
        let ids: Vec<String> = (0..50)
            .map(|_| new_site("https://example.com/", None, vec![], String::new()).id)
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn screenshot_url_percent_encodes_the_target() {
        let url = screenshot_url("https://example.com/page?a=b").unwrap();
        assert!(url.starts_with("https://s0.wp.com/mshots/v1/https%3A%2F%2Fexample.com"));
        assert!(url.ends_with("?w=800"));
        assert!(!url.contains("page?a=b"));
    }

    #[test]
    fn csv_import_skips_header_and_splits_tags() {
        let csv = "url,name,tags,description\n\
                   example.com,Example,prod;eu,Main site\n\
                   ,missing-url,,\n\
                   other.org,,,";
        let records = parse_import(csv, ImportFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "example.com");
        assert_eq!(records[0].tags, vec!["prod", "eu"]);
        assert_eq!(records[1].url, "other.org");
        assert!(records[1].name.is_none());
    }

    #[test]
    fn text_import_takes_one_url_per_line() {
        let records =
            parse_import("example.com\n\n  other.org  \n", ImportFormat::Text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].url, "other.org");
    }

    #[test]
    fn json_import_round_trips() {
        let json = r#"[{"url": "example.com", "name": "Example", "tags": ["a"]}]"#;
        let records = parse_import(json, ImportFormat::Json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Example"));
    }
}
