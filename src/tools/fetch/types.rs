use serde::{Deserialize, Serialize};

/// Result of a proxied fetch including telemetry metadata.
///
/// Contains the fetched body text and metadata about the fetch:
/// - Which proxy relay succeeded
/// - The upstream HTTP status
/// - How long the whole fallback sequence took
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// The fetched body text (already unwrapped from any relay envelope).
    pub text: String,
    /// HTTP status returned by the winning proxy.
    pub status: u16,
    /// The proxy prefix that succeeded.
    pub proxy: String,
    /// Total duration across all attempts, in milliseconds.
    pub duration_ms: u64,
}

impl FetchResult {
    /// Consume the result and return just the body text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Minimal shape of a proxy HTTP response, as seen by the fallback loop.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}
