//! Markup stripping and entity decoding for fetched report payloads.

use std::sync::OnceLock;

use regex::Regex;

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity pattern"))
}

/// Turn a raw payload into plain multi-line text. Never fails.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = line_break_re().replace_all(&text, "\n");
    let text = tag_re().replace_all(&text, "");
    decode_entities(&text).trim().to_string()
}

/// Decode the common named entities and numeric character references.
/// Unknown entities are left as written.
pub fn decode_entities(text: &str) -> String {
    entity_re()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let body = &caps[1];
            decode_entity(body).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<String> {
    let named = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    };
    if let Some(c) = named {
        return Some(c.to_string());
    }
    let numeric = body.strip_prefix('#')?;
    let code = match numeric.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => numeric.parse::<u32>().ok()?,
    };
    let c = char::from_u32(code)?;
    // non-breaking spaces separate thousands in some locales
    Some(if c == '\u{a0}' { ' ' } else { c }.to_string())
}
