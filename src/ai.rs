//! Generative-AI analysis of fetched page content.
//!
//! Talks to the Google Generative Language API: one `generateContent` call
//! per analysis, forced to JSON output, parsed into [`AiAnalysis`]. Page
//! HTML is stripped down to visible text before it goes into the prompt.

use crate::error::{MonitorError, Result};
use crate::types::AiAnalysis;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Prompt input is truncated to this many characters of cleaned text.
const MAX_PROMPT_CHARS: usize = 15_000;

pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sitewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        })
    }

    /// Point the client at a different API host. Used by tests.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Analyze cleaned page text and return the structured result.
    pub async fn analyze(&self, site_url: &str, page_text: &str) -> Result<AiAnalysis> {
        let body = generate_request_body(site_url, page_text);
        let url = format!(
            "{}/v1beta/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response: Value = self.http.post(&url).json(&body).send().await?.json().await?;
        parse_generate_response(&response)
    }

    /// Model names the API offers, as listed by the `models` endpoint.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1beta/models?key={}", self.base_url, self.api_key);
        let response: Value = self.http.get(&url).send().await?.json().await?;
        if let Some(message) = response.pointer("/error/message").and_then(Value::as_str) {
            return Err(MonitorError::AiRequest(message.to_string()));
        }
        let models = response
            .pointer("/models")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.pointer("/name").and_then(Value::as_str))
                    .map(|name| name.to_string())
                    .collect()
            })
            .unwrap_or_default();
        Ok(models)
    }
}

fn generate_request_body(site_url: &str, page_text: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(site_url, page_text) }] }],
        "generationConfig": { "responseMimeType": "application/json" }
    })
}

fn build_prompt(site_url: &str, page_text: &str) -> String {
    format!(
        "You are analyzing the website at {site_url}. Based on the page text \
         below, respond with a JSON object with exactly these fields: \
         \"description\" (a concise two-sentence summary of what the site is), \
         \"projects\" (an array of objects with \"name\" and \"description\" \
         for any products or projects mentioned; empty if none), and \
         \"events\" (an array of objects with \"name\", \"date\", and \
         \"description\" for any upcoming events mentioned; empty if none).\n\n\
         Page text:\n{page_text}"
    )
}

/// Pull the model's JSON payload out of a `generateContent` response. An
/// API-level error surfaces as `AiRequest`; a payload that is not the
/// expected shape surfaces as `AiInvalidJson`.
fn parse_generate_response(response: &Value) -> Result<AiAnalysis> {
    if let Some(message) = response.pointer("/error/message").and_then(Value::as_str) {
        return Err(MonitorError::AiRequest(message.to_string()));
    }
    let text = response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| MonitorError::AiRequest("response had no candidates".into()))?;
    serde_json::from_str(text).map_err(|e| MonitorError::AiInvalidJson(e.to_string()))
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const SKIPPED_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "template", "link", "meta"];

/// Visible text of a document: markup stripped, script/style and metadata
/// subtrees dropped, whitespace collapsed, length capped.
pub fn clean_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces = Vec::new();

    for node in document.tree.nodes() {
        let text = match node.value() {
            Node::Text(t) => t.trim(),
            _ => continue,
        };
        if text.is_empty() {
            continue;
        }
        let skipped = node.ancestors().any(|a| match a.value() {
            Node::Element(e) => SKIPPED_ELEMENTS.contains(&e.name()),
            _ => false,
        });
        if skipped {
            continue;
        }
        pieces.push(text.to_string());
    }

    let joined = pieces.join(" ");
    let collapsed = WHITESPACE.replace_all(&joined, " ");
    let trimmed = collapsed.trim();
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        trimmed.chars().take(MAX_PROMPT_CHARS).collect()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_drops_scripts_and_styles() {
        let html = r#"<html><head><style>body { color: red }</style>
            <script>var x = 1;</script></head>
            <body><h1>Hello</h1><p>World</p><noscript>enable js</noscript></body></html>"#;
        let text = clean_page_text(html);
        assert_eq!(text, "Hello World");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        let html = "<body><p>a\n\n   b</p>\t<p>c</p></body>";
        assert_eq!(clean_page_text(html), "a b c");
        assert_eq!(clean_page_text("<html></html>"), "");
    }

    #[test]
    fn clean_text_is_length_capped() {
        let html = format!("<body><p>{}</p></body>", "x".repeat(MAX_PROMPT_CHARS * 2));
        assert_eq!(clean_page_text(&html).chars().count(), MAX_PROMPT_CHARS);
    }

    #[test]
    fn generate_response_payload_parses() {
        let payload = serde_json::json!({
            "description": "A site.",
            "projects": [{ "name": "Thing", "description": "Does stuff" }],
            "events": []
        })
        .to_string();
        let response = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": payload }] } }]
        });
        let analysis = parse_generate_response(&response).unwrap();
        assert_eq!(analysis.description, "A site.");
        assert_eq!(analysis.projects.len(), 1);
        assert!(analysis.events.is_empty());
    }

    #[test]
    fn api_error_surfaces_as_request_error() {
        let response = serde_json::json!({
            "error": { "code": 400, "message": "API key not valid" }
        });
        match parse_generate_response(&response) {
            Err(MonitorError::AiRequest(m)) => assert!(m.contains("API key")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_json_payload_surfaces_as_invalid_json() {
        let response = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "not json at all" }] } }]
        });
        assert!(matches!(
            parse_generate_response(&response),
            Err(MonitorError::AiInvalidJson(_))
        ));
    }

    #[test]
    fn empty_candidates_is_a_request_error() {
        let response = serde_json::json!({ "candidates": [] });
        assert!(matches!(
            parse_generate_response(&response),
            Err(MonitorError::AiRequest(_))
        ));
    }

    #[test]
    fn prompt_embeds_url_and_text() {
        let body = generate_request_body("https://example.com/", "page text here");
        let prompt = body
            .pointer("/contents/0/parts/0/text")
            .and_then(serde_json::Value::as_str)
            .unwrap();
        assert!(prompt.contains("https://example.com/"));
        assert!(prompt.contains("page text here"));
        assert_eq!(
            body.pointer("/generationConfig/responseMimeType")
                .and_then(serde_json::Value::as_str),
            Some("application/json")
        );
    }
}
