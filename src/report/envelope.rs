//! Unwrap report text delivered inside an XML feed or an HTML page.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::report::normalize::normalize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("payload is not an XML/HTML envelope")]
    NotAnEnvelope,
    #[error("envelope has no report element")]
    MissingContent,
}

fn cdata_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid cdata pattern"))
}

fn content_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(content|report|pre)(?:\s[^>]*)?>(.*?)</(?:content|report|pre)\s*>")
            .expect("valid content pattern")
    })
}

/// Extract the inner report text of an envelope.
///
/// CDATA sections win over `<content>`, `<report>` and `<pre>` elements.
pub fn unwrap_envelope(raw: &str) -> Result<String, EnvelopeError> {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('<') {
        return Err(EnvelopeError::NotAnEnvelope);
    }
    if let Some(caps) = cdata_re().captures(raw) {
        return Ok(caps[1].to_string());
    }
    content_re()
        .captures(raw)
        .map(|caps| caps[2].to_string())
        .ok_or(EnvelopeError::MissingContent)
}

/// Normalize a fetched payload, unwrapping its envelope when there is one.
/// A payload whose envelope cannot be unwrapped is normalized whole.
pub fn normalize_payload(raw: &str) -> String {
    match unwrap_envelope(raw) {
        Ok(inner) => normalize(&inner),
        Err(err) => {
            debug!(error = %err, "normalizing payload without unwrapping");
            normalize(raw)
        }
    }
}
