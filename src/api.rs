use crate::ai::{self, AiClient};
use crate::engine::Checker;
use crate::sites::{self, ImportRecord};
use crate::{error::*, history, store::*, types::*};
use serde::{Deserialize, Serialize};
use std::time::Instant;

// Helper functions for logging - ignore errors to not break main operations
fn log_info(site: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = crate::log::ActivityLogger::new() {
        let _ = logger.info(site, event, details);
    }
}

fn log_error(site: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = crate::log::ActivityLogger::new() {
        let _ = logger.error(site, event, details);
    }
}

/// Find a site by id first, then by normalized URL.
fn position_of(sites: &[Site], target: &str) -> Result<usize> {
    if let Some(i) = sites.iter().position(|s| s.id == target) {
        return Ok(i);
    }
    if let Ok(url) = sites::normalize_url(target) {
        if let Some(i) = sites.iter().position(|s| s.url == url) {
            return Ok(i);
        }
    }
    Err(MonitorError::SiteNotFound(target.into()))
}

/* ------------ site lifecycle ------------ */

/// Normalize, reject duplicates, run the first check, persist.
pub async fn add_site<S: SiteStore>(
    store: &S,
    checker: &Checker,
    url: &str,
    name: Option<&str>,
    tags: Vec<String>,
    description: String,
) -> Result<Site> {
    let start_time = Instant::now();
    let url = sites::normalize_url(url)?;

    let mut all = store.load_sites()?;
    if all.iter().any(|s| s.url == url) {
        log_error(Some(&url), "add_site", Some("duplicate"));
        return Err(MonitorError::DuplicateSite(url));
    }

    let mut site = sites::new_site(&url, name, tags, description);
    checker.check_site(&mut site).await;

    all.push(site.clone());
    store.save_sites(&all)?;

    let details = format!("succeeded in {}ms", start_time.elapsed().as_millis());
    log_info(Some(&url), "add_site", Some(&details));
    Ok(site)
}

pub fn list_sites<S: SiteStore>(store: &S) -> Result<Vec<Site>> {
    store.load_sites()
}

pub fn get_site<S: SiteStore>(store: &S, target: &str) -> Result<Site> {
    let all = store.load_sites()?;
    let i = position_of(&all, target)?;
    Ok(all[i].clone())
}

/// Update name/tags/description in place. `None` leaves a field untouched.
pub fn update_site<S: SiteStore>(
    store: &S,
    target: &str,
    name: Option<String>,
    tags: Option<Vec<String>>,
    description: Option<String>,
) -> Result<Site> {
    let mut all = store.load_sites()?;
    let i = position_of(&all, target)?;
    if let Some(name) = name {
        all[i].name = name;
    }
    if let Some(tags) = tags {
        all[i].tags = tags;
    }
    if let Some(description) = description {
        all[i].description = description;
    }
    let site = all[i].clone();
    store.save_sites(&all)?;
    log_info(Some(&site.url), "update_site", None);
    Ok(site)
}

/// Remove a site by id or URL, returning the removed record.
pub fn delete_site<S: SiteStore>(store: &S, target: &str) -> Result<Site> {
    let start_time = Instant::now();
    let mut all = store.load_sites()?;
    let i = position_of(&all, target)?;
    let site = all.remove(i);
    store.save_sites(&all)?;
    let details = format!("succeeded in {}ms", start_time.elapsed().as_millis());
    log_info(Some(&site.url), "delete_site", Some(&details));
    Ok(site)
}

/* ------------ checking ------------ */

pub async fn check_site<S: SiteStore>(store: &S, checker: &Checker, target: &str) -> Result<Site> {
    let start_time = Instant::now();
    let mut all = store.load_sites()?;
    let i = position_of(&all, target)?;
    checker.check_site(&mut all[i]).await;
    let site = all[i].clone();
    store.save_sites(&all)?;

    let duration = start_time.elapsed();
    match site.status {
        SiteStatus::Offline => {
            let details = format!("offline, {}ms", duration.as_millis());
            log_error(Some(&site.url), "check_site", Some(&details));
        }
        _ => {
            let details = format!("succeeded in {}ms", duration.as_millis());
            log_info(Some(&site.url), "check_site", Some(&details));
        }
    }
    Ok(site)
}

/// Check every site with staggered starts and persist the results. A run
/// that is refused because one is already in flight surfaces as an error
/// rather than silently returning stale records.
pub async fn check_all<S: SiteStore>(store: &S, checker: &Checker) -> Result<Vec<Site>> {
    let start_time = Instant::now();
    let mut all = store.load_sites()?;
    if !checker.check_all(&mut all).await {
        log_error(None, "check_all", Some("already in progress"));
        return Err(MonitorError::Other("check already in progress".into()));
    }
    store.save_sites(&all)?;
    let details = format!(
        "{} sites in {}ms",
        all.len(),
        start_time.elapsed().as_millis()
    );
    log_info(None, "check_all", Some(&details));
    Ok(all)
}

/* ------------ import / export ------------ */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Add every importable record, skipping invalid URLs and duplicates, then
/// run one bulk check over the whole collection.
pub async fn import_sites<S: SiteStore>(
    store: &S,
    checker: &Checker,
    records: Vec<ImportRecord>,
) -> Result<ImportSummary> {
    let start_time = Instant::now();
    let mut all = store.load_sites()?;
    let mut summary = ImportSummary::default();

    for record in records {
        let url = match sites::normalize_url(&record.url) {
            Ok(url) => url,
            Err(_) => {
                summary.skipped += 1;
                continue;
            }
        };
        if all.iter().any(|s| s.url == url) {
            summary.skipped += 1;
            continue;
        }
        all.push(sites::new_site(
            &url,
            record.name.as_deref(),
            record.tags,
            record.description,
        ));
        summary.imported += 1;
    }

    checker.check_all(&mut all).await;
    store.save_sites(&all)?;

    let details = format!(
        "{} imported, {} skipped in {}ms",
        summary.imported,
        summary.skipped,
        start_time.elapsed().as_millis()
    );
    log_info(None, "import_sites", Some(&details));
    Ok(summary)
}

pub fn export_sites<S: SiteStore>(store: &S) -> Result<Vec<ExportRecord>> {
    Ok(store.load_sites()?.iter().map(sites::export_record).collect())
}

/* ------------ history and stats ------------ */

pub fn site_history<S: SiteStore>(store: &S, target: &str) -> Result<Vec<HistoryEntry>> {
    Ok(get_site(store, target)?.check_history)
}

pub fn clear_history<S: SiteStore>(store: &S, target: &str) -> Result<Site> {
    let mut all = store.load_sites()?;
    let i = position_of(&all, target)?;
    all[i].check_history.clear();
    let site = all[i].clone();
    store.save_sites(&all)?;
    log_info(Some(&site.url), "clear_history", None);
    Ok(site)
}

pub fn stats<S: SiteStore>(store: &S) -> Result<history::FleetStats> {
    Ok(history::fleet_stats(&store.load_sites()?))
}

/* ------------ AI analysis ------------ */

/// Fetch the site's page, strip it to visible text, and run it through the
/// AI collaborator. A failed analysis leaves the stored record untouched.
pub async fn analyze_site<S: SiteStore>(
    store: &S,
    checker: &Checker,
    ai: &AiClient,
    target: &str,
) -> Result<Site> {
    let start_time = Instant::now();
    let mut all = store.load_sites()?;
    let i = position_of(&all, target)?;
    let url = all[i].url.clone();

    let result = async {
        let page = checker.fetch_page(&url).await?;
        let text = ai::clean_page_text(&page.text);
        ai.analyze(&url, &text).await
    }
    .await;

    let duration = start_time.elapsed();
    match result {
        Ok(analysis) => {
            if !analysis.description.is_empty() {
                all[i].description = analysis.description.clone();
            }
            all[i].ai_analysis = Some(analysis);
            let site = all[i].clone();
            store.save_sites(&all)?;
            let details = format!("succeeded in {}ms", duration.as_millis());
            log_info(Some(&url), "analyze_site", Some(&details));
            Ok(site)
        }
        Err(e) => {
            let details = format!("failed in {}ms", duration.as_millis());
            log_error(Some(&url), "analyze_site", Some(&details));
            Err(e)
        }
    }
}

/* ------------ settings ------------ */

pub fn get_settings<S: SiteStore>(store: &S) -> Result<Settings> {
    store.load_settings()
}

pub fn update_settings<S: SiteStore>(store: &S, settings: &Settings) -> Result<Settings> {
    store.save_settings(settings)?;
    log_info(None, "update_settings", None);
    Ok(settings.clone())
}
