use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

/// Public CORS-proxy relays, in priority order. The order is the fallback
/// order for every fetch; it is never randomized.
pub const DEFAULT_PROXIES: [&str; 3] = [
    "https://api.codetabs.com/v1/proxy?quest=",
    "https://api.allorigins.win/get?url=",
    "https://corsproxy.io/?",
];

// Same escape set as encodeURIComponent: everything but alphanumerics and
// - _ . ! ~ * ' ( ) gets percent-encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string for use as a URL component.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Build the relay request URL for a target.
pub(super) fn build_proxy_url(proxy: &str, target: &str) -> String {
    format!("{proxy}{}", encode_component(target))
}

/// Whether this relay wraps the upstream body in a JSON envelope instead of
/// passing it through raw.
pub(super) fn uses_envelope(proxy: &str) -> bool {
    proxy.contains("allorigins")
}

#[derive(Deserialize)]
struct Envelope {
    contents: Option<String>,
}

/// Unwrap an allorigins-style `{"contents": ...}` envelope. A missing
/// `contents` field is an empty body, not a failure; a body that is not
/// valid JSON is.
pub(super) fn unwrap_envelope(body: &str) -> Result<String, String> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| format!("bad proxy envelope: {e}"))?;
    Ok(envelope.contents.unwrap_or_default())
}
