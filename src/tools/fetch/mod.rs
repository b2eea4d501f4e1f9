//! Proxied fetching with sequential fallback.
//!
//! Every request goes through a public CORS-proxy relay rather than straight
//! to the target: try each configured relay in order with a bounded
//! per-attempt timeout, and short-circuit on the first success. There are no
//! retries beyond the list itself and no backoff between attempts.

mod proxies;

pub mod types;

pub use proxies::{encode_component, DEFAULT_PROXIES};
pub use types::*;

use crate::error::{MonitorError, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Default per-attempt timeout.
pub const REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Transport seam for the fallback loop: one GET, network errors as plain
/// messages. Lets tests script proxy behavior without a network.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, String>;
}

/// Reqwest-backed transport used outside of tests.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sitewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProxyTransport for HttpTransport {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;
        Ok(RawResponse { status, body })
    }
}

/// Fetch a target URL's text through the configured relays.
///
/// Attempts are strictly sequential; each failure records a reason and moves
/// on. A timed-out attempt is treated identically to a failed one. The first
/// 2xx response wins: its body is unwrapped from the relay envelope where the
/// relay uses one, and an empty body is a success with `""`. When every relay
/// fails the error aggregates all recorded reasons.
pub async fn fetch_via_proxies(
    transport: &dyn ProxyTransport,
    proxies: &[String],
    target: &str,
    timeout: Duration,
) -> Result<FetchResult> {
    let start = Instant::now();
    let mut reasons = Vec::new();

    for proxy in proxies {
        let proxy_url = proxies::build_proxy_url(proxy, target);

        let response = match tokio::time::timeout(timeout, transport.get(&proxy_url)).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                reasons.push(format!("{proxy}: {e}"));
                continue;
            }
            Err(_) => {
                reasons.push(format!("{proxy}: timed out after {}ms", timeout.as_millis()));
                continue;
            }
        };

        if !(200..300).contains(&response.status) {
            reasons.push(format!("{proxy}: HTTP {}", response.status));
            continue;
        }

        let text = if proxies::uses_envelope(proxy) {
            match proxies::unwrap_envelope(&response.body) {
                Ok(t) => t,
                Err(e) => {
                    reasons.push(format!("{proxy}: {e}"));
                    continue;
                }
            }
        } else {
            response.body
        };

        return Ok(FetchResult {
            text,
            status: response.status,
            proxy: proxy.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        });
    }

    Err(MonitorError::AllProxiesFailed { reasons })
}

/// Convenience: fetch through the default relay list with the default
/// timeout.
pub async fn fetch_text(transport: &dyn ProxyTransport, target: &str) -> Result<String> {
    let proxies: Vec<String> = DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect();
    fetch_via_proxies(
        transport,
        &proxies,
        target,
        Duration::from_millis(REQUEST_TIMEOUT_MS),
    )
    .await
    .map(FetchResult::into_text)
}
