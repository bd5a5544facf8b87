//! Text resource validation.
//!
//! The text format is a sequence of bracketed section headers
//! (`[ext_resource type="Texture" path="res://icon.png" id="1"]`) followed by
//! property lines. Only headers whose identifier mentions `resource` are
//! parsed; their `key=value` tail is checked against the trust boundary and
//! the executable-type blacklist. A coarse scan for embedded script source
//! runs over the whole text afterwards.
//!
//! Patterns run on the `regex` crate, which matches in linear time, so
//! adversarial input cannot trigger catastrophic backtracking.

use crate::error::{ResGuardError, Result};
use crate::validate::config::PolicyConfig;
use crate::validate::outcome::{RejectKind, Rejection, Verdict};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, warn};

// A complete section header, used only to tell sectioned text from plain text.
static SECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[(?P<section>[A-Za-z0-9_-]+)(?P<params>.*?)\]")
        .expect("valid section regex")
});

static SECTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?P<section>[A-Za-z0-9_-]+)").expect("valid section start regex")
});

// key=value; value is a quoted string with backslash escapes, or a bare token.
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<key>[A-Za-z0-9_-]+)\s*=\s*(?P<value>"(?:[^"\\]|\\(?s:.))*"|[^\s"]*)"#)
        .expect("valid tag regex")
});

static RESOURCE_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[[A-Za-z0-9_-]*resource[A-Za-z0-9_-]*").expect("valid opener regex")
});

/// One resource section header with its parameters in source order.
///
/// Keys are lower-cased; values have their surrounding quotes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSection {
    pub name: String,
    pub params: Vec<(String, String)>,
}

impl ParsedSection {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn unquote(raw: &str) -> &str {
    let v = raw.trim();
    let v = v.strip_prefix('"').unwrap_or(v);
    v.strip_suffix('"').unwrap_or(v)
}

/// Parse a section's parameter tail. A repeated key is a parse anomaly:
/// whichever occurrence a loader honors, one of them would go unchecked.
pub fn parse_params(section: &str, tail: &str) -> Result<Vec<(String, String)>> {
    let mut params: Vec<(String, String)> = Vec::new();
    for cap in TAG_PATTERN.captures_iter(tail) {
        let key = cap["key"].to_ascii_lowercase();
        let value = unquote(&cap["value"]).to_string();
        if params.iter().any(|(k, _)| *k == key) {
            return Err(ResGuardError::ParseAnomaly {
                section: section.to_string(),
                message: format!("duplicate key '{key}'"),
            });
        }
        params.push((key, value));
    }
    Ok(params)
}

/// Offset of the `]` that closes a header tail, skipping quoted strings.
///
/// `None` when the tail runs out first, including inside an unterminated
/// quoted value.
fn quoted_tail_end(tail: &str) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, b) in tail.bytes().enumerate() {
        if in_quote {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_quote = false,
                _ => {}
            }
        } else if b == b'"' {
            in_quote = true;
        } else if b == b']' {
            return Some(i);
        }
    }
    None
}

/// Extract every section whose identifier contains `resource`
/// (case-insensitive), in file order.
///
/// A resource header ends at the first `]` outside a quoted value; a header
/// that never closes is a parse anomaly. Every resource opener
/// (`[...resource...`) in the text must also begin one of the extracted
/// headers. An opener swallowed by another header's tail is an anomaly too.
pub fn parse_resource_sections(text: &str) -> Result<Vec<ParsedSection>> {
    let mut out = Vec::new();
    let mut starts = Vec::new();
    let mut pos = 0;
    while let Some(cap) = SECTION_START.captures_at(text, pos) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.name("section")) else {
            break;
        };
        let name = name.as_str();
        let tail = &text[whole.end()..];

        if !name.to_ascii_lowercase().contains("resource") {
            match tail.find(']') {
                Some(end) => pos = whole.end() + end + 1,
                None => break,
            }
            continue;
        }

        let Some(end) = quoted_tail_end(tail) else {
            return Err(ResGuardError::ParseAnomaly {
                section: name.to_string(),
                message: format!(
                    "section header at byte {} has no closing ']' outside quotes",
                    whole.start()
                ),
            });
        };
        starts.push(whole.start());
        out.push(ParsedSection {
            name: name.to_string(),
            params: parse_params(name, &tail[..end])?,
        });
        pos = whole.end() + end + 1;
    }

    // Both sequences are in ascending order.
    let mut known = starts.iter().peekable();
    for opener in RESOURCE_OPENER.find_iter(text) {
        while known.next_if(|&&s| s < opener.start()).is_some() {}
        if known.next_if(|&&s| s == opener.start()).is_some() {
            continue;
        }
        return Err(ResGuardError::ParseAnomaly {
            section: opener.as_str().trim_start_matches('[').to_string(),
            message: format!(
                "section header at byte {} is unterminated or nested",
                opener.start()
            ),
        });
    }

    Ok(out)
}

/// Decode bytes as UTF-8 text, strictly. A UTF-8 BOM is skipped; any other
/// BOM or malformed sequence is a decode error.
pub fn decode_text(data: &[u8]) -> Result<Cow<'_, str>> {
    let body = match Encoding::for_bom(data) {
        Some((enc, bom_len)) if enc == UTF_8 => &data[bom_len..],
        Some((enc, _)) => {
            return Err(ResGuardError::Decode {
                offset: 0,
                message: format!("unsupported text encoding {}", enc.name()),
            })
        }
        None => data,
    };
    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| ResGuardError::Decode {
            offset: Encoding::utf8_valid_up_to(body) + (data.len() - body.len()),
            message: "invalid UTF-8 sequence".to_string(),
        })
}

/// True when `value` is inside the trusted package: it starts with
/// `prefix` (ASCII case-insensitive) and has no `..` segment that could
/// climb out of it.
pub fn is_trusted_reference(value: &str, prefix: &str) -> bool {
    let Some(head) = value.get(..prefix.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(prefix) {
        return false;
    }
    !value[prefix.len()..]
        .split(['/', '\\'])
        .any(|segment| segment == "..")
}

/// Policy-driven validator for the text format.
#[derive(Debug, Clone)]
pub struct TextValidator {
    trusted_prefix: String,
    type_blacklist: HashSet<String>,
    source_marker: AhoCorasick,
    reject_unrecognized: bool,
}

impl TextValidator {
    pub fn new(policy: &PolicyConfig) -> Result<Self> {
        let source_marker = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build([policy.source_marker.as_str()])
            .map_err(|e| ResGuardError::Config(format!("source marker: {e}")))?;
        Ok(Self {
            trusted_prefix: policy.trusted_prefix.clone(),
            type_blacklist: policy
                .type_blacklist
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            source_marker,
            reject_unrecognized: policy.reject_unrecognized,
        })
    }

    fn check_section(&self, section: &ParsedSection) -> Option<Rejection> {
        if let Some(path) = section.param("path") {
            if !is_trusted_reference(path, &self.trusted_prefix) {
                return Some(Rejection::new(
                    RejectKind::ExternalPath,
                    format!("[{}] references '{}' outside the package", section.name, path),
                ));
            }
        } else if let Some(ty) = section.param("type") {
            if self.type_blacklist.contains(&ty.to_lowercase()) {
                return Some(Rejection::new(
                    RejectKind::BlacklistedType,
                    format!("[{}] declares inline executable type '{}'", section.name, ty),
                ));
            }
        }
        None
    }

    /// Inspect decoded text. `Ok(None)` means no violation was found.
    pub fn inspect_text(&self, text: &str) -> Result<Option<Rejection>> {
        let sections = parse_resource_sections(text)?;
        debug!(sections = sections.len(), "Parsed resource sections");

        if let Some(rejection) = sections.iter().find_map(|s| self.check_section(s)) {
            return Ok(Some(rejection));
        }

        if let Some(m) = self.source_marker.find(text) {
            return Ok(Some(Rejection::new(
                RejectKind::SourceMarker,
                format!("embedded script source marker at byte {}", m.start()),
            )));
        }

        if self.reject_unrecognized && !SECTION_PATTERN.is_match(text) {
            return Ok(Some(Rejection::new(
                RejectKind::Unrecognized,
                "no section header found",
            )));
        }

        Ok(None)
    }

    /// Decode and inspect raw bytes.
    pub fn inspect(&self, data: &[u8]) -> Result<Option<Rejection>> {
        let text = decode_text(data)?;
        self.inspect_text(&text)
    }

    /// Classify raw bytes as text, failing closed on any error.
    pub fn classify_text(&self, path: &str, data: &[u8]) -> Verdict {
        match self.inspect(data) {
            Ok(None) => Verdict::Safe,
            Ok(Some(rejection)) => {
                warn!(path = %path, reason = %rejection, "Text resource rejected");
                Verdict::Unsafe
            }
            Err(e) => {
                crate::log_error!(e, path);
                Verdict::Unsafe
            }
        }
    }
}
