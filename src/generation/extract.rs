use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Spans from the first `{` to the last `}` of the reply.
static JSON_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON span pattern is valid"));

/// Key under which replies with no JSON object at all are returned.
pub const RAW_TEXT_KEY: &str = "content";

#[derive(Debug, thiserror::Error)]
#[error("The model reply contained a JSON-like span that could not be parsed.")]
pub struct ExtractionError {
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

/// Pull the reading object out of a free-form model reply.
///
/// A reply with no `{...}` span is plain prose and is wrapped as
/// `{"content": raw}`. A span that is present but does not parse is an
/// error carrying the raw reply.
pub fn extract_json(raw: &str) -> Result<Value, ExtractionError> {
    match JSON_SPAN.find(raw) {
        None => Ok(serde_json::json!({ RAW_TEXT_KEY: raw.trim() })),
        Some(span) => serde_json::from_str(span.as_str()).map_err(|source| {
            tracing::error!(raw_reply = %raw, error = %source, "Failed to parse model reply as JSON");
            ExtractionError {
                raw: raw.to_string(),
                source,
            }
        }),
    }
}
