use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monitoring status of a site. `Checking` is transient: it only exists
/// between the start of a check and its terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SiteStatus {
    #[default]
    NotChecked,
    Checking,
    Online,
    Offline,
    /// Registrar placeholder, "coming soon" page, or default server page.
    Parking,
    /// Reachable but serving error/placeholder content.
    Invalid,
}

impl SiteStatus {
    /// Statuses that count as a problem in fleet-wide stats.
    pub fn is_issue(self) -> bool {
        matches!(
            self,
            SiteStatus::Offline | SiteStatus::Parking | SiteStatus::Invalid
        )
    }
}

/// Outcome class of a single recorded check. History tracks reachability
/// only: a fetch that succeeded but classified as parking/invalid is still
/// recorded as `Online` here, while the site's `status` says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub status: HistoryStatus,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// A monitored target. Mutated in place by every check cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    /// Normalized absolute URL, scheme-qualified.
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: SiteStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub response_time_ms: Option<u64>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub title: String,
    pub favicon: Option<String>,
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    /// Oldest first, capped at `history::MAX_ENTRIES`.
    #[serde(default)]
    pub check_history: Vec<HistoryEntry>,
    pub ai_analysis: Option<AiAnalysis>,
    pub added_at: DateTime<Utc>,
}

/// Structured result returned by the generative-AI collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub description: String,
    #[serde(default)]
    pub projects: Vec<AiProject>,
    #[serde(default)]
    pub events: Vec<AiEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiEvent {
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub offline: bool,
    pub online: bool,
    pub slow_response: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            offline: true,
            online: true,
            slow_response: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub check_interval_ms: u64,
    pub slow_response_threshold_ms: u64,
    pub notifications: NotificationPrefs,
    #[serde(default)]
    pub ai_api_key: String,
    pub ai_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_interval_ms: 300_000, // 5 minutes
            slow_response_threshold_ms: 3_000,
            notifications: NotificationPrefs::default(),
            ai_api_key: String::new(),
            ai_model: "models/gemini-1.5-flash-latest".into(),
        }
    }
}

/// Flat per-site record for exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub url: String,
    pub name: String,
    pub tags: Vec<String>,
    pub description: String,
    pub status: SiteStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub response_time_ms: Option<u64>,
    pub availability: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
