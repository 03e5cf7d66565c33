//! Structural markup scan for the extraction pass.
//!
//! Where the sequencer produces flat chunks for traversal, this pass
//! produces a node list that keeps structural elements (templates,
//! tables, lists) addressable for substitution while leaving everything
//! else as text runs. Extent rules are the same as the block
//! extractors': brace-depth balancing for templates, open/close
//! delimiters for tables, marker runs for lists, degrade to end of
//! input when unterminated.

use crate::parsing::blocks;
use crate::parsing::patterns::{ListItem, Table, Template};

/// One structural node of the markup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// A `{{...}}` template span. `name` is the raw template name,
    /// untrimmed of case but trimmed of whitespace.
    Template { name: String, source: String },
    /// A `{|...|}` table span.
    Table { source: String },
    /// A run of list-item lines; `items` hold each item's wikitext with
    /// the leading marker run stripped.
    List { source: String, items: Vec<String> },
    /// Anything else, blank lines included.
    Text { source: String },
}

impl MarkupNode {
    /// The raw source of this node.
    pub fn source(&self) -> &str {
        match self {
            MarkupNode::Template { source, .. }
            | MarkupNode::Table { source }
            | MarkupNode::List { source, .. }
            | MarkupNode::Text { source } => source,
        }
    }
}

/// Scans markup into a flat, ordered node list.
pub fn parse_tree(input: &str) -> Vec<MarkupNode> {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut nodes = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut i = 0;

    let flush_text = |nodes: &mut Vec<MarkupNode>, start: &mut Option<usize>, end: usize| {
        if let Some(s) = start.take() {
            nodes.push(MarkupNode::Text {
                source: lines[s..end].join("\n"),
            });
        }
    };

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();

        if trimmed.starts_with(Template::OPEN) {
            flush_text(&mut nodes, &mut text_start, i);
            let span = blocks::template(&lines, i);
            nodes.push(MarkupNode::Template {
                name: template_name(&span.text),
                source: span.text,
            });
            i = span.end;
        } else if Table::opens(trimmed) {
            flush_text(&mut nodes, &mut text_start, i);
            let span = blocks::table(&lines, i);
            nodes.push(MarkupNode::Table { source: span.text });
            i = span.end;
        } else if ListItem::matches(line) {
            flush_text(&mut nodes, &mut text_start, i);
            let span = blocks::list(&lines, i);
            let items = span
                .text
                .lines()
                .map(|l| {
                    let markers = ListItem::markers(l).map_or(0, str::len);
                    l[markers..].trim().to_string()
                })
                .collect();
            nodes.push(MarkupNode::List {
                source: span.text,
                items,
            });
            i = span.end;
        } else {
            if text_start.is_none() {
                text_start = Some(i);
            }
            i += 1;
        }
    }
    flush_text(&mut nodes, &mut text_start, lines.len());

    nodes
}

/// The template name: text after `{{` up to the first `|`, `}}`, or
/// newline, trimmed.
fn template_name(source: &str) -> String {
    let after = source
        .find(Template::OPEN)
        .map(|p| &source[p + Template::OPEN.len()..])
        .unwrap_or(source);
    let end = after
        .find(['|', '\n'])
        .into_iter()
        .chain(after.find(Template::CLOSE))
        .min()
        .unwrap_or(after.len());
    after[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_text_and_structures() {
        let input = "Intro prose.\n{{Infobox person\n| name = Ada\n}}\nMore prose.";
        let nodes = parse_tree(input);
        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[0], MarkupNode::Text { source } if source == "Intro prose."));
        assert!(matches!(&nodes[1], MarkupNode::Template { name, .. } if name == "Infobox person"));
        assert!(matches!(&nodes[2], MarkupNode::Text { source } if source == "More prose."));
    }

    #[test]
    fn table_node_spans_delimiters() {
        let nodes = parse_tree("{|\n|-\n| a\n|}");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], MarkupNode::Table { source } if source.ends_with("|}")));
    }

    #[test]
    fn list_node_strips_markers_from_items() {
        let nodes = parse_tree("* one\n** two\n# three");
        match &nodes[0] {
            MarkupNode::List { items, .. } => {
                assert_eq!(items, &["one", "two", "three"]);
            }
            other => panic!("expected list node, got {other:?}"),
        }
    }

    #[test]
    fn template_name_of_single_line_template() {
        let nodes = parse_tree("{{Citation needed}}");
        assert!(matches!(&nodes[0], MarkupNode::Template { name, .. } if name == "Citation needed"));
    }

    #[test]
    fn blank_lines_stay_in_text_runs() {
        let nodes = parse_tree("a\n\nb");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].source(), "a\n\nb");
    }

    #[test]
    fn unterminated_template_reaches_eof() {
        let nodes = parse_tree("{{Infobox x\n| name = y");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], MarkupNode::Template { .. }));
    }
}
