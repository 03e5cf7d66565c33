//! Infobox field parsing.
//!
//! Extracts the declared type name and the `| key = value` field map
//! from a balanced infobox span. Only single-line field values are
//! captured; a value continuing on following lines is truncated at the
//! first line. Downstream consumers rely on that simpler behavior, so
//! it is a documented limitation rather than something to fix here.

use std::collections::BTreeMap;

use super::patterns::Template;

/// Placeholder type when no name follows the `infobox` keyword.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Structured data parsed out of an infobox span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoboxData {
    /// Declared type, e.g. `person` for `{{Infobox person`.
    pub infobox_type: String,
    pub fields: BTreeMap<String, String>,
}

impl InfoboxData {
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Parses the type name and field map from a raw infobox span.
pub fn parse_infobox(source: &str) -> InfoboxData {
    InfoboxData {
        infobox_type: parse_type_name(source)
            .unwrap_or(UNKNOWN_TYPE)
            .to_string(),
        fields: parse_fields(source),
    }
}

/// The token following `infobox` up to the first `|` or newline, trimmed.
fn parse_type_name(source: &str) -> Option<&str> {
    let open = source.find(Template::OPEN)?;
    let after = source[open + Template::OPEN.len()..].trim_start();
    if after.len() < Template::INFOBOX.len()
        || !after[..Template::INFOBOX.len()].eq_ignore_ascii_case(Template::INFOBOX)
    {
        return None;
    }
    let rest = &after[Template::INFOBOX.len()..];
    let end = rest.find(['|', '\n']).unwrap_or(rest.len());
    let name = rest[..end].trim().trim_end_matches("}}").trim();
    (!name.is_empty()).then_some(name)
}

/// Fields from lines of the form `| name = value`.
///
/// The name is everything before the first `=`, the value the trimmed
/// remainder; fields whose value trims to empty are dropped.
fn parse_fields(source: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in source.lines() {
        let Some(rest) = line.strip_prefix('|') else {
            continue;
        };
        let Some((name, value)) = rest.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        fields.insert(name.to_string(), value.to_string());
    }
    fields
}
