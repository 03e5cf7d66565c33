//! Element extraction and placeholder substitution.
//!
//! A structural pass over the markup node tree pulls tables, infoboxes
//! and qualifying bullet-list groups into an id-addressed registry,
//! leaving a unique marker token in the residual plain text for each
//! extracted element, plus a context-window lookup over that text by
//! element id.

pub mod flatten;
pub mod ids;
pub mod tree;

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parsing::fields;
use crate::parsing::patterns::Template;

use flatten::flatten;
use ids::IdGenerator;
use tree::{MarkupNode, parse_tree};

/// Registry key the raw template name is stored under in an infobox
/// field map.
pub const TEMPLATE_NAME_KEY: &str = "_template_name";

/// Category of an extracted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Table,
    Infobox,
    ListGroup,
}

impl Category {
    /// The tag embedded in this category's markers.
    pub fn marker_tag(self) -> &'static str {
        match self {
            Category::Table => "TABLE",
            Category::Infobox => "INFOBOX",
            Category::ListGroup => "LIST",
        }
    }

    /// The marker token substituted into residual text, `__TAG_id__`.
    pub fn marker(self, id: &str) -> String {
        format!("__{}_{}__", self.marker_tag(), id)
    }
}

/// Category-specific element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ElementPayload {
    /// Raw table source.
    Raw(String),
    /// Infobox field map, raw template name included under
    /// [`TEMPLATE_NAME_KEY`].
    Fields(BTreeMap<String, String>),
    /// Ordered plain-text items of a bullet-list group.
    Items(Vec<String>),
}

impl ElementPayload {
    /// Textual rendering used for round-trip reconstruction and for
    /// handing the element to a collaborator.
    pub fn rendered(&self) -> String {
        match self {
            ElementPayload::Raw(source) => source.clone(),
            ElementPayload::Fields(map) => {
                serde_json::to_string_pretty(map).expect("string map serializes")
            }
            ElementPayload::Items(items) => items.join("\n"),
        }
    }
}

/// A structural unit pulled out of the text during the extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedElement {
    pub id: String,
    pub category: Category,
    pub payload: ElementPayload,
}

/// What to include in a context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub include_before: bool,
    pub include_after: bool,
    /// Maximum characters taken on each requested side.
    pub window: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            include_before: true,
            include_after: true,
            window: 200,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Distinct from a found marker with an empty window.
    #[error("no marker found for element id `{0}`")]
    MarkerNotFound(String),
}

/// Result of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Flattened text with one marker per extracted element.
    pub residual_text: String,
    /// Extracted elements keyed by id.
    pub registry: BTreeMap<String, ExtractedElement>,
}

impl Extraction {
    pub fn get(&self, id: &str) -> Option<&ExtractedElement> {
        self.registry.get(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Elements of one category, in id order.
    pub fn by_category(&self, category: Category) -> Vec<&ExtractedElement> {
        self.registry
            .values()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Context window around this element's marker in the residual text.
    pub fn context(&self, id: &str, opts: &ContextOptions) -> Result<String, ExtractError> {
        get_context(&self.residual_text, id, opts)
    }
}

/// Runs the extraction pass over raw markup.
///
/// Passes run per node in document order; infobox templates are
/// categorized before the generic table handling so they are never
/// double-counted, and non-infobox templates stay in the text for the
/// flattening step to strip.
pub fn extract_elements(input: &str, ids: &dyn IdGenerator) -> Extraction {
    let mut registry = BTreeMap::new();
    let mut pieces: Vec<String> = Vec::new();

    for node in parse_tree(input) {
        match node {
            MarkupNode::Template { ref name, ref source } => {
                if !name.to_lowercase().starts_with(Template::INFOBOX) {
                    // Not an infobox: leave in place, flatten strips it.
                    pieces.push(source.clone());
                    continue;
                }
                let data = fields::parse_infobox(source);
                let mut map = data.fields;
                map.insert(TEMPLATE_NAME_KEY.to_string(), name.clone());
                let id = ids.next_id();
                pieces.push(Category::Infobox.marker(&id));
                registry.insert(
                    id.clone(),
                    ExtractedElement {
                        id,
                        category: Category::Infobox,
                        payload: ElementPayload::Fields(map),
                    },
                );
            }
            MarkupNode::Table { source } => {
                let id = ids.next_id();
                pieces.push(Category::Table.marker(&id));
                registry.insert(
                    id.clone(),
                    ExtractedElement {
                        id,
                        category: Category::Table,
                        payload: ElementPayload::Raw(source),
                    },
                );
            }
            MarkupNode::List { ref source, ref items } => {
                // Only unordered bullet lists carry list-group
                // semantics; numbered and definition lists are
                // discarded outright.
                if !source.trim().starts_with('*') {
                    pieces.push(String::new());
                    continue;
                }
                let flat_items: Vec<String> = items
                    .iter()
                    .map(|item| flatten(item).trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect();
                if flat_items.is_empty() {
                    pieces.push(String::new());
                    continue;
                }
                let id = ids.next_id();
                pieces.push(Category::ListGroup.marker(&id));
                registry.insert(
                    id.clone(),
                    ExtractedElement {
                        id,
                        category: Category::ListGroup,
                        payload: ElementPayload::Items(flat_items),
                    },
                );
            }
            MarkupNode::Text { source } => pieces.push(source),
        }
    }

    let residual_text = flatten(&pieces.join("\n")).trim().to_string();
    tracing::debug!(
        elements = registry.len(),
        residual_chars = residual_text.len(),
        "extraction pass complete"
    );

    Extraction {
        residual_text,
        registry,
    }
}

/// Context window around the marker for `id` in a residual text.
///
/// The marker is matched by id with the category wildcarded. Each
/// requested side is clipped at the text bounds and trimmed, then the
/// parts are concatenated, preceding first. Requesting neither side is
/// a valid empty result; a missing marker is [`ExtractError::MarkerNotFound`].
pub fn get_context(
    residual: &str,
    id: &str,
    opts: &ContextOptions,
) -> Result<String, ExtractError> {
    let pattern = format!("__[A-Z]+_{}__", regex::escape(id));
    let re = Regex::new(&pattern).expect("marker pattern is valid");
    let m = re
        .find(residual)
        .ok_or_else(|| ExtractError::MarkerNotFound(id.to_string()))?;

    let mut out = String::new();
    if opts.include_before {
        let pre: String = residual[..m.start()]
            .chars()
            .rev()
            .take(opts.window)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        out.push_str(pre.trim());
    }
    if opts.include_after {
        let post: String = residual[m.end()..].chars().take(opts.window).collect();
        out.push_str(post.trim());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ids::SequentialIdGenerator;
    use pretty_assertions::assert_eq;

    fn run(input: &str) -> Extraction {
        extract_elements(input, &SequentialIdGenerator::new())
    }

    #[test]
    fn infobox_becomes_marker_and_fields() {
        let input = "{{Infobox person\n| name = John Doe\n| occupation = Engineer\n}}\n\nHello.";
        let ex = run(input);

        assert_eq!(ex.len(), 1);
        let element = ex.get("0").unwrap();
        assert_eq!(element.category, Category::Infobox);
        match &element.payload {
            ElementPayload::Fields(map) => {
                assert_eq!(map.get("name").map(String::as_str), Some("John Doe"));
                assert_eq!(map.get("occupation").map(String::as_str), Some("Engineer"));
                assert_eq!(
                    map.get(TEMPLATE_NAME_KEY).map(String::as_str),
                    Some("Infobox person")
                );
            }
            other => panic!("expected fields payload, got {other:?}"),
        }
        assert_eq!(ex.residual_text, "__INFOBOX_0__\n\nHello.");
    }

    #[test]
    fn tables_are_extracted_unfiltered() {
        let input = "Before.\n{|\n|-\n| a\n|}\nAfter.";
        let ex = run(input);
        let tables = ex.by_category(Category::Table);
        assert_eq!(tables.len(), 1);
        assert!(matches!(
            &tables[0].payload,
            ElementPayload::Raw(src) if src.starts_with("{|") && src.ends_with("|}")
        ));
        assert!(ex.residual_text.contains("__TABLE_0__"));
    }

    #[test]
    fn bullet_list_kept_numbered_list_discarded() {
        let bulleted = run("* item1\n* item2");
        assert_eq!(bulleted.len(), 1);
        let element = bulleted.registry.values().next().unwrap();
        assert_eq!(element.category, Category::ListGroup);
        assert_eq!(
            element.payload,
            ElementPayload::Items(vec!["item1".to_string(), "item2".to_string()])
        );

        let numbered = run("# item1\n# item2");
        assert!(numbered.is_empty());
        assert_eq!(numbered.residual_text, "");
    }

    #[test]
    fn list_items_are_flattened_to_plain_text() {
        let ex = run("* '''Bold''' item\n* [[Target|Link]] item\n*   ");
        let element = ex.registry.values().next().unwrap();
        assert_eq!(
            element.payload,
            ElementPayload::Items(vec!["Bold item".to_string(), "Link item".to_string()])
        );
    }

    #[test]
    fn bullet_list_of_empty_items_is_discarded() {
        let ex = run("* ''''''\n*  ");
        assert!(ex.is_empty());
    }

    #[test]
    fn non_infobox_templates_are_not_registered() {
        let ex = run("{{Citation needed}}\n\nProse stays.");
        assert!(ex.is_empty());
        assert_eq!(ex.residual_text, "Prose stays.");
    }

    #[test]
    fn each_marker_appears_exactly_once() {
        let input = "{{Infobox a\n| x = 1\n}}\n{|\n|}\n* one\n* two";
        let ex = run(input);
        assert_eq!(ex.len(), 3);
        for element in ex.registry.values() {
            let marker = element.category.marker(&element.id);
            assert_eq!(ex.residual_text.matches(&marker).count(), 1);
        }
    }

    #[test]
    fn round_trip_reconstructs_structural_content() {
        let input = "{|\n|-\n| a\n|}\n\nProse.";
        let ex = run(input);
        let mut restored = ex.residual_text.clone();
        for element in ex.registry.values() {
            let marker = element.category.marker(&element.id);
            restored = restored.replace(&marker, &element.payload.rendered());
        }
        assert!(restored.contains("| a"));
        assert!(restored.contains("Prose."));
    }

    #[test]
    fn context_before_and_after() {
        let ex = run("Intro text.\n{|\n|}\nAfter text.");
        let both = ex.context("0", &ContextOptions::default()).unwrap();
        assert_eq!(both, "Intro text.After text.");

        let before = ex
            .context(
                "0",
                &ContextOptions {
                    include_before: true,
                    include_after: false,
                    window: 200,
                },
            )
            .unwrap();
        assert_eq!(before, "Intro text.");
    }

    #[test]
    fn context_is_symmetric_between_split_and_combined_requests() {
        let ex = run("Some prose before.\n{|\n|}\nAnd prose after.");
        let window = 10;
        let before = ex
            .context("0", &ContextOptions { include_before: true, include_after: false, window })
            .unwrap();
        let after = ex
            .context("0", &ContextOptions { include_before: false, include_after: true, window })
            .unwrap();
        let both = ex
            .context("0", &ContextOptions { include_before: true, include_after: true, window })
            .unwrap();
        assert_eq!(format!("{before}{after}"), both);
    }

    #[test]
    fn context_with_neither_side_is_empty_not_error() {
        let ex = run("a\n{|\n|}\nb");
        let none = ex
            .context(
                "0",
                &ContextOptions {
                    include_before: false,
                    include_after: false,
                    window: 50,
                },
            )
            .unwrap();
        assert_eq!(none, "");
    }

    #[test]
    fn context_for_unknown_id_is_not_found() {
        let ex = run("a\n{|\n|}\nb");
        let err = ex.context("missing", &ContextOptions::default()).unwrap_err();
        assert!(matches!(err, ExtractError::MarkerNotFound(id) if id == "missing"));
    }

    #[test]
    fn context_window_clips_at_bounds() {
        let ex = run("ab\n{|\n|}\ncd");
        let ctx = ex
            .context(
                "0",
                &ContextOptions {
                    include_before: true,
                    include_after: false,
                    window: 1000,
                },
            )
            .unwrap();
        assert_eq!(ctx, "ab");
    }
}
