//! Downstream collaborator screening.
//!
//! A collaborator (an LLM subprocess, a rules engine, anything) receives
//! an element summary and answers with raw text that should contain
//! either a boolean verdict or a field-to-column mapping as JSON.
//! Responses are often chatty or fenced in Markdown code blocks, and
//! sometimes plain garbage; anything unparseable rejects the element
//! rather than failing the run.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::{Category, ElementPayload, ExtractedElement, Extraction, TEMPLATE_NAME_KEY};

/// Lightweight element summary handed to a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub category: Category,
    /// Declared type name for infoboxes, when present.
    pub type_name: Option<String>,
    /// Field names (infobox) or header cells (table); empty for lists.
    pub columns: Vec<String>,
    /// A small data sample: first row cells, first items, or first
    /// field values.
    pub sample: Vec<String>,
}

/// The external verdict producer. How the answer is produced is none of
/// the engine's business; only the textual response comes back.
pub trait Collaborator {
    fn assess(&self, request: &AssessmentRequest) -> String;
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
});

/// Strips a Markdown code fence from a chatty response, returning the
/// fenced body, or the trimmed response when no fence is present.
pub fn strip_code_fences(response: &str) -> &str {
    match CODE_FENCE.captures(response) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim(),
        None => response.trim(),
    }
}

/// Parses a `{"valid": bool}` verdict; anything else is `None`.
pub fn parse_verdict(response: &str) -> Option<bool> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(response)).ok()?;
    value.get("valid")?.as_bool()
}

/// Parses a `{"mappings": {field: column}}` response; anything else is
/// `None`. Null column values are skipped.
pub fn parse_mapping(response: &str) -> Option<BTreeMap<String, String>> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(response)).ok()?;
    let mappings = value.get("mappings")?.as_object()?;
    Some(
        mappings
            .iter()
            .filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
            .collect(),
    )
}

/// Builds the summary handed to a collaborator for one element.
pub fn summarize(element: &ExtractedElement) -> AssessmentRequest {
    match &element.payload {
        ElementPayload::Fields(map) => AssessmentRequest {
            category: element.category,
            type_name: map.get(TEMPLATE_NAME_KEY).cloned(),
            columns: map
                .keys()
                .filter(|k| k.as_str() != TEMPLATE_NAME_KEY)
                .cloned()
                .collect(),
            sample: map
                .iter()
                .filter(|(k, _)| k.as_str() != TEMPLATE_NAME_KEY)
                .take(3)
                .map(|(_, v)| v.clone())
                .collect(),
        },
        ElementPayload::Raw(source) => AssessmentRequest {
            category: element.category,
            type_name: None,
            columns: table_headers(source),
            sample: first_table_row(source),
        },
        ElementPayload::Items(items) => AssessmentRequest {
            category: element.category,
            type_name: None,
            columns: Vec::new(),
            sample: items.iter().take(3).cloned().collect(),
        },
    }
}

/// Screens every registered element through the collaborator, returning
/// accepted ids in registry order. Malformed or negative responses drop
/// the element; nothing here can fail the run.
pub fn screen_registry(extraction: &Extraction, collaborator: &dyn Collaborator) -> Vec<String> {
    extraction
        .registry
        .values()
        .filter(|element| {
            let response = collaborator.assess(&summarize(element));
            let accepted = parse_verdict(&response).unwrap_or(false);
            if !accepted {
                tracing::debug!(id = %element.id, "element rejected by collaborator");
            }
            accepted
        })
        .map(|element| element.id.clone())
        .collect()
}

/// Header cells from a table source: `!`-prefixed lines split on `!!`.
fn table_headers(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.strip_prefix('!'))
        .flat_map(|rest| rest.split("!!"))
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Cells of the first data row: the first `|`-prefixed line after a
/// `|-` separator, split on `||`.
fn first_table_row(source: &str) -> Vec<String> {
    let mut in_body = false;
    for line in source.lines() {
        if line.starts_with("|-") {
            in_body = true;
            continue;
        }
        if in_body
            && let Some(rest) = line.strip_prefix('|')
            && !rest.starts_with('}')
        {
            return rest
                .split("||")
                .map(|cell| cell.trim().to_string())
                .filter(|cell| !cell.is_empty())
                .collect();
        }
    }
    Vec::new()
}
