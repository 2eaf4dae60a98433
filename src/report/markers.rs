//! Line classification shared by the primary parse and the post-battle pass.

use std::sync::OnceLock;

use regex::Regex;

/// Label given to the synthetic aggregate section of summary-layout reports.
pub const ALL_ATTACKERS_LABEL: &str = "All attackers";

const AFTER_BATTLE_MARKERS: &[&str] = &["after the battle", "dopo la battaglia"];
const ALL_ATTACKERS_WORDING: &[&str] = &["all attackers", "tutti gli attaccanti"];
const DESTROYED_MARKERS: &[&str] = &["destroyed", "distrutto", "distrutta", "distrutti"];
const SEPARATOR_CHARS: &str = "-=_*~.#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderForm {
    /// `Attacker <label>`
    Attacker,
    /// `Defender <label>`
    Defender,
    /// The fixed all-attackers header.
    AllAttackers,
    /// `<label> Defender`
    TrailingDefender,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub form: HeaderForm,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    AfterBattle,
    Terminal,
    Header(Header),
    Destroyed,
    Other(&'a str),
}

fn terminal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(has won the battle|ha vinto la battaglia|ended in a draw|ends in a draw|ended with a draw|terminata in parit|finisce in parit)",
        )
        .expect("valid terminal pattern")
    })
}

fn leading_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(attacker|attaccante|defender|difensore)\s+(.+)$")
            .expect("valid leading header pattern")
    })
}

fn trailing_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(.+?)\s+(defender|difensore):?$").expect("valid trailing header pattern")
    })
}

pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_separator(trimmed) {
        return LineKind::Blank;
    }
    if is_after_battle_marker(trimmed) {
        return LineKind::AfterBattle;
    }
    if terminal_re().is_match(trimmed) {
        return LineKind::Terminal;
    }
    if let Some(header) = parse_header(trimmed) {
        return LineKind::Header(header);
    }
    if is_destroyed_marker(trimmed) {
        return LineKind::Destroyed;
    }
    LineKind::Other(trimmed)
}

pub fn is_separator(trimmed: &str) -> bool {
    trimmed.chars().count() >= 3 && trimmed.chars().all(|c| SEPARATOR_CHARS.contains(c))
}

pub fn is_after_battle_marker(line: &str) -> bool {
    let core = line.trim().trim_end_matches([':', '.']).trim_end();
    AFTER_BATTLE_MARKERS
        .iter()
        .any(|marker| core.eq_ignore_ascii_case(marker))
}

pub fn is_destroyed_marker(line: &str) -> bool {
    let core = line.trim().trim_end_matches('!').trim_end();
    DESTROYED_MARKERS
        .iter()
        .any(|marker| core.eq_ignore_ascii_case(marker))
}

fn mentions_all_attackers(line: &str) -> bool {
    let lower = line.to_lowercase();
    ALL_ATTACKERS_WORDING.iter().any(|w| lower.contains(w))
}

fn is_all_attackers_header(line: &str) -> bool {
    let core = line.trim().trim_end_matches(':').trim_end();
    ALL_ATTACKERS_WORDING
        .iter()
        .any(|w| core.eq_ignore_ascii_case(w))
}

pub fn parse_header(trimmed: &str) -> Option<Header> {
    if let Some(caps) = leading_header_re().captures(trimmed) {
        let form = match caps[1].to_ascii_lowercase().as_str() {
            "attacker" | "attaccante" => HeaderForm::Attacker,
            _ => HeaderForm::Defender,
        };
        if let Some(label) = extract_label(&caps[2]) {
            return Some(Header { form, label });
        }
    }
    if is_all_attackers_header(trimmed) {
        return Some(Header {
            form: HeaderForm::AllAttackers,
            label: ALL_ATTACKERS_LABEL.to_string(),
        });
    }
    if mentions_all_attackers(trimmed) {
        return None;
    }
    let caps = trailing_header_re().captures(trimmed)?;
    let label = extract_label(&caps[1])?;
    Some(Header {
        form: HeaderForm::TrailingDefender,
        label,
    })
}

/// Player label from header text: cut before coordinates, origin or alliance tag.
fn extract_label(raw: &str) -> Option<String> {
    let mut end = raw.len();
    for cut in [" from ", " da ", " [", " ("] {
        if let Some(pos) = raw.find(cut) {
            end = end.min(pos);
        }
    }
    let label = raw[..end].trim().trim_end_matches(':').trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}
