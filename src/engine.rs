//! Check orchestration: one site at a time, or the whole collection with
//! staggered starts behind a single in-flight guard.

use crate::error::Result;
use crate::history;
use crate::sites;
use crate::tools::batch;
use crate::tools::classify;
use crate::tools::fetch::{
    self, FetchResult, HttpTransport, ProxyTransport, DEFAULT_PROXIES, REQUEST_TIMEOUT_MS,
};
use crate::types::{HistoryStatus, NotificationPrefs, Settings, Site, SiteStatus};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Receiver for fire-and-forget domain events (status transitions, slow
/// responses, refused batch starts). Delivery failures must not affect the
/// recorded check result, so the call cannot fail.
pub trait EventSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Sink that drops every event.
pub struct NullSink;
impl EventSink for NullSink {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Relay prefixes in fallback order.
    pub proxies: Vec<String>,
    /// Per-proxy-attempt timeout.
    pub timeout: Duration,
    /// Start offset between consecutive sites in a bulk check.
    pub stagger: Duration,
    pub slow_response_threshold_ms: u64,
    pub notifications: NotificationPrefs,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            proxies: DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect(),
            timeout: Duration::from_millis(REQUEST_TIMEOUT_MS),
            stagger: Duration::from_millis(200),
            slow_response_threshold_ms: 3_000,
            notifications: NotificationPrefs::default(),
        }
    }
}

impl From<&Settings> for CheckOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            slow_response_threshold_ms: settings.slow_response_threshold_ms,
            notifications: settings.notifications.clone(),
            ..Self::default()
        }
    }
}

/// Orchestrates checks over injected collaborators. The in-flight guard is
/// instance state, not a global: two `Checker`s never contend.
pub struct Checker {
    transport: Box<dyn ProxyTransport>,
    events: Box<dyn EventSink>,
    opts: CheckOptions,
    in_flight: AtomicBool,
}

impl Checker {
    pub fn new(
        transport: Box<dyn ProxyTransport>,
        events: Box<dyn EventSink>,
        opts: CheckOptions,
    ) -> Self {
        Self {
            transport,
            events,
            opts,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Real transport, silent sink, default options.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            Box::new(HttpTransport::new()?),
            Box::new(NullSink),
            CheckOptions::default(),
        ))
    }

    /// One proxied fetch with this checker's relay list and timeout.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchResult> {
        fetch::fetch_via_proxies(&*self.transport, &self.opts.proxies, url, self.opts.timeout)
            .await
    }

    /// Check a single site, mutating it in place.
    ///
    /// Never fails past this boundary: every failure path lands on a
    /// terminal status with a populated `error_message`. A fetch that
    /// succeeds but classifies as parking/invalid still records an online
    /// history entry: history tracks reachability, `status` tracks content.
    pub async fn check_site(&self, site: &mut Site) {
        let previous = site.status;
        site.status = SiteStatus::Checking;
        site.error_message = None;
        site.screenshot_url = sites::screenshot_url(&site.url);

        let started = Instant::now();
        match self.fetch_page(&site.url).await {
            Ok(result) => {
                let elapsed = started.elapsed().as_millis() as u64;
                site.response_time_ms = Some(elapsed);
                site.last_checked = Some(Utc::now());

                let content = classify::classify(&result.text, &site.url);
                site.status = content.status;
                site.title = content.title;
                if site.description.is_empty() {
                    if let Some(description) = content.description {
                        site.description = description;
                    }
                }
                site.favicon = content.favicon;
                site.social_links = content.social_links;
                site.ssl = site.url.starts_with("https://");

                history::append(site, HistoryStatus::Online, Some(elapsed), None);

                if previous == SiteStatus::Offline
                    && site.status == SiteStatus::Online
                    && self.opts.notifications.online
                {
                    self.events
                        .notify(&format!("{} is back online", site.name), Severity::Success);
                }
            }
            Err(e) => {
                let message = e.to_string();
                site.status = SiteStatus::Offline;
                site.last_checked = Some(Utc::now());
                site.response_time_ms = None;
                site.error_message = Some(message.clone());

                history::append(site, HistoryStatus::Offline, None, Some(message));

                if previous == SiteStatus::Online && self.opts.notifications.offline {
                    self.events
                        .notify(&format!("{} is offline", site.name), Severity::Error);
                }
            }
        }

        if let Some(elapsed) = site.response_time_ms {
            if elapsed > self.opts.slow_response_threshold_ms
                && self.opts.notifications.slow_response
            {
                self.events.notify(
                    &format!("{} is responding slowly ({elapsed}ms)", site.name),
                    Severity::Warning,
                );
            }
        }
    }

    /// Check every site with staggered starts. Returns `false` (a no-op,
    /// not a queue) when an equivalent run is already in flight; the guard
    /// clears once every check has settled, whatever the outcomes.
    pub async fn check_all(&self, sites: &mut [Site]) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.events
                .notify("Check already in progress", Severity::Warning);
            return false;
        }

        let targets: Vec<&mut Site> = sites.iter_mut().collect();
        batch::staggered(targets, self.opts.stagger, |site| self.check_site(site)).await;

        self.in_flight.store(false, Ordering::SeqCst);
        true
    }
}
