//! Regex-driven content classification and metadata extraction.
//!
//! Given fetched HTML, decide whether the page is real content, a parking
//! placeholder, or error/placeholder text, and pull out title, description,
//! favicon, and social-profile links. [`classify`] is a pure function of its
//! inputs: identical HTML yields identical results on every call.

mod patterns;

use crate::types::{SiteStatus, SocialLink};
use std::collections::HashSet;
use url::Url;

/// Bodies at or below this many characters classify as `Invalid`.
const MIN_BODY_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// One of `Online`, `Parking`, `Invalid`.
    pub status: SiteStatus,
    pub title: String,
    pub description: Option<String>,
    pub favicon: Option<String>,
    pub social_links: Vec<SocialLink>,
}

/// Classify fetched HTML and extract metadata. `base_url` anchors relative
/// favicon resolution.
pub fn classify(html: &str, base_url: &str) -> Classification {
    Classification {
        status: determine_status(html),
        title: extract_title(html),
        description: extract_description(html),
        favicon: extract_favicon(html, base_url),
        social_links: find_social_links(html),
    }
}

/// Parking patterns win over invalid patterns; anything else is online.
fn determine_status(html: &str) -> SiteStatus {
    if patterns::PARKING.iter().any(|re| re.is_match(html)) {
        return SiteStatus::Parking;
    }
    if html.trim().is_empty()
        || html.chars().count() <= MIN_BODY_CHARS
        || patterns::INVALID.iter().any(|re| re.is_match(html))
    {
        return SiteStatus::Invalid;
    }
    SiteStatus::Online
}

/// First `<title>` element's text, trimmed; empty when absent.
fn extract_title(html: &str) -> String {
    patterns::TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Meta description, honoring the matched quote character as the closing
/// delimiter. Empty captures yield `None`.
fn extract_description(html: &str) -> Option<String> {
    let captures = patterns::DESCRIPTION.captures(html)?;
    let value = captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().trim())?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Declared favicon resolved against the base URL, falling back to
/// `/favicon.ico`. A malformed base yields `None` rather than an error.
fn extract_favicon(html: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let href = patterns::FAVICON
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    match href {
        Some(href) => base.join(&href).ok().map(|u| u.to_string()),
        None => base.join("/favicon.ico").ok().map(|u| u.to_string()),
    }
}

/// Scan the whole document with each platform's pattern. The entire matched
/// substring becomes the link URL, `https://`-prefixed when schemeless.
/// Exact matched strings are deduplicated across the whole document; each
/// platform may still contribute its own distinct matches.
fn find_social_links(html: &str) -> Vec<SocialLink> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    for (platform, re) in patterns::SOCIAL.iter() {
        for found in re.find_iter(html) {
            let matched = found.as_str();
            if !seen.insert(matched.to_string()) {
                continue;
            }
            let url = if matched.starts_with("http") {
                matched.to_string()
            } else {
                format!("https://{matched}")
            };
            links.push(SocialLink {
                platform: (*platform).to_string(),
                url,
            });
        }
    }

    links
}
