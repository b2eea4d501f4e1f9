//! Bounded per-site check history and the availability figures derived
//! from it.
//!
//! Every retained entry is weighted equally: there is no time decay and no
//! windowing, so availability is simply the share of `Online` outcomes among
//! the (at most [`MAX_ENTRIES`]) retained checks.

use crate::types::{HistoryEntry, HistoryStatus, Site, SiteStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Hard cap on retained entries per site. Appending past the cap evicts
/// exactly the single oldest entry.
pub const MAX_ENTRIES: usize = 100;

/// Append a check outcome to the site's history, evicting the oldest entry
/// once the cap is exceeded.
pub fn append(
    site: &mut Site,
    status: HistoryStatus,
    response_time_ms: Option<u64>,
    error: Option<String>,
) {
    site.check_history.push(HistoryEntry {
        timestamp: Utc::now(),
        status,
        response_time_ms,
        error,
    });
    if site.check_history.len() > MAX_ENTRIES {
        site.check_history.remove(0);
    }
}

/// Availability as an integer percentage of retained entries that were
/// `Online`. Empty history reads as 0, not 100.
pub fn availability(site: &Site) -> u32 {
    if site.check_history.is_empty() {
        return 0;
    }
    let online = site
        .check_history
        .iter()
        .filter(|e| e.status == HistoryStatus::Online)
        .count();
    ((online as f64 / site.check_history.len() as f64) * 100.0).round() as u32
}

/// Aggregate figures across the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FleetStats {
    pub total: usize,
    pub online: usize,
    pub issues: usize,
    /// Mean per-site availability, rounded.
    pub availability: u32,
}

pub fn fleet_stats(sites: &[Site]) -> FleetStats {
    if sites.is_empty() {
        return FleetStats::default();
    }
    let online = sites
        .iter()
        .filter(|s| s.status == SiteStatus::Online)
        .count();
    let issues = sites.iter().filter(|s| s.status.is_issue()).count();
    let total_availability: u32 = sites.iter().map(availability).sum();
    FleetStats {
        total: sites.len(),
        online,
        issues,
        availability: ((total_availability as f64 / sites.len() as f64).round()) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::new_site;

    fn site() -> Site {
        new_site("https://example.com/", None, vec![], String::new())
    }

    #[test]
    fn empty_history_reads_zero() {
        assert_eq!(availability(&site()), 0);
    }

    #[test]
    fn availability_rounds_to_nearest_percent() {
        let mut s = site();
        append(&mut s, HistoryStatus::Online, Some(100), None);
        append(&mut s, HistoryStatus::Online, Some(100), None);
        append(&mut s, HistoryStatus::Offline, None, Some("boom".into()));
        // 2/3 = 66.67 -> 67
        assert_eq!(availability(&s), 67);
    }

    #[test]
    fn cap_keeps_exactly_the_newest_entries() {
        let mut s = site();
        for i in 0..250u64 {
            append(&mut s, HistoryStatus::Online, Some(i), None);
        }
        assert_eq!(s.check_history.len(), MAX_ENTRIES);
        // Oldest retained entry is check #150, newest is #249, in order.
        assert_eq!(s.check_history[0].response_time_ms, Some(150));
        assert_eq!(s.check_history[99].response_time_ms, Some(249));
        let times: Vec<_> = s
            .check_history
            .iter()
            .map(|e| e.response_time_ms.unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fleet_stats_counts_issue_statuses() {
        let mut a = site();
        a.status = SiteStatus::Online;
        append(&mut a, HistoryStatus::Online, Some(10), None);
        let mut b = site();
        b.status = SiteStatus::Parking;
        append(&mut b, HistoryStatus::Online, Some(10), None);
        let mut c = site();
        c.status = SiteStatus::Offline;
        append(&mut c, HistoryStatus::Offline, None, None);

        let stats = fleet_stats(&[a, b, c]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.online, 1);
        assert_eq!(stats.issues, 2);
        // per-site availabilities 100, 100, 0 -> mean 67
        assert_eq!(stats.availability, 67);
    }

    #[test]
    fn fleet_stats_empty_collection() {
        assert_eq!(fleet_stats(&[]), FleetStats::default());
    }
}
