use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("site already monitored: {0}")]
    DuplicateSite(String),

    #[error("no site found for {0}")]
    SiteNotFound(String),

    /// Every configured proxy relay failed; carries one reason per attempt.
    #[error("all proxies failed: {}", reasons.join(", "))]
    AllProxiesFailed { reasons: Vec<String> },

    #[error("AI returned invalid JSON: {0}")]
    AiInvalidJson(String),

    #[error("AI request failed: {0}")]
    AiRequest(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

/* Conversions so `?` works smoothly */
impl From<std::io::Error> for MonitorError {
    fn from(e: std::io::Error) -> Self {
        MonitorError::Storage(e.to_string())
    }
}
impl From<serde_json::Error> for MonitorError {
    fn from(e: serde_json::Error) -> Self {
        MonitorError::Other(e.to_string())
    }
}
impl From<reqwest::Error> for MonitorError {
    fn from(e: reqwest::Error) -> Self {
        MonitorError::Other(e.to_string())
    }
}
