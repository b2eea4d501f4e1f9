/// Compiled-once pattern tables for content classification.
///
/// `regex::Regex` keeps no match-position state, so the same compiled
/// pattern can be reused across classifications without any reset step.
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// Registrar parking pages, placeholders, and default server pages.
pub(super) static PARKING: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)domain\s+for\s+sale",
        r"(?i)this\s+domain\s+is\s+for\s+sale",
        r"(?i)buy\s+this\s+domain",
        r"(?i)domain\s+parking",
        r"(?i)parked\s+domain",
        r"(?i)coming\s+soon",
        r"(?i)under\s+construction",
        r"(?i)page\s+not\s+found",
        r"(?i)404\s+error",
        r"(?i)default\s+page",
        r"(?i)welcome\s+to\s+nginx",
        r"(?i)apache.*default\s+page",
    ])
});

/// Error/placeholder content on otherwise reachable hosts.
pub(super) static INVALID: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)access\s+denied",
        r"(?i)forbidden",
        r"(?i)internal\s+server\s+error",
        r"(?i)service\s+unavailable",
        r"(?i)bad\s+gateway",
        r"(?i)gateway\s+timeout",
        r"(?i)maintenance\s+mode",
        r"(?i)lorem\s+ipsum",
    ])
});

pub(super) static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<title[^>]*>([^<]*)</title>").expect("valid regex"));

// The opening quote also delimits the close, so a single-quoted value may
// contain double quotes and vice versa. One branch per quote style stands
// in for a backreference, which this regex engine does not support.
pub(super) static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta[^>]*name=["']description["'][^>]*content=(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid regex")
});

pub(super) static FAVICON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<link[^>]*rel=["'](?:icon|shortcut icon|apple-touch-icon)["'][^>]*href=["']([^"']*)["']"#,
    )
    .expect("valid regex")
});

/// Social platforms in a fixed scan order. The whole matched substring (not
/// the captured handle) becomes the link URL.
pub(super) static SOCIAL: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("facebook", r"(?i)facebook\.com/([A-Za-z0-9._-]+)"),
        (
            "twitter",
            r"(?i)twitter\.com/([A-Za-z0-9._-]+)|x\.com/([A-Za-z0-9._-]+)",
        ),
        ("instagram", r"(?i)instagram\.com/([A-Za-z0-9._-]+)"),
        ("linkedin", r"(?i)linkedin\.com/(?:in|company)/([A-Za-z0-9._-]+)"),
        (
            "youtube",
            r"(?i)youtube\.com/(?:c/|channel/|user/|@)([A-Za-z0-9._-]+)",
        ),
        ("tiktok", r"(?i)tiktok\.com/@([A-Za-z0-9._-]+)"),
        ("github", r"(?i)github\.com/([A-Za-z0-9._-]+)"),
    ]
    .into_iter()
    .map(|(platform, pattern)| (platform, Regex::new(pattern).expect("valid regex")))
    .collect()
});
