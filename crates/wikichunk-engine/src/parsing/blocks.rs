//! Per-construct block extractors.
//!
//! Each extractor consumes lines starting at `start` and returns the
//! raw span plus an exclusive end index. Malformed input (unterminated
//! tables, templates, code blocks) consumes to end of input rather than
//! erroring; a best-effort chunk sequence beats strict well-formedness
//! in this domain.

use super::patterns::{CodeBlock, Heading, HorizontalRule, ListItem, Table, Template};

/// A consumed block span with exclusive-end line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    pub text: String,
    pub end: usize,
}

fn span(lines: &[&str], start: usize, end: usize) -> BlockSpan {
    BlockSpan {
        text: lines[start..end].join("\n"),
        end,
    }
}

/// Consumes consecutive plain lines.
///
/// Stops at a blank line or any line that opens a heading, table, list
/// item, or horizontal rule.
pub fn paragraph(lines: &[&str], start: usize) -> BlockSpan {
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty()
            || Heading::parse(line).is_some()
            || Table::opens(line)
            || ListItem::matches(line)
            || HorizontalRule::matches(line)
        {
            break;
        }
        i += 1;
    }
    span(lines, start, i)
}

/// Consumes from the `{|` line through the first `|}` line inclusive.
pub fn table(lines: &[&str], start: usize) -> BlockSpan {
    let mut i = start + 1;
    while i < lines.len() {
        if Table::closes(lines[i]) {
            return span(lines, start, i + 1);
        }
        i += 1;
    }
    span(lines, start, lines.len())
}

/// Consumes a maximal run of list-item lines, any marker combination.
pub fn list(lines: &[&str], start: usize) -> BlockSpan {
    let mut i = start;
    while i < lines.len() && ListItem::matches(lines[i]) {
        i += 1;
    }
    span(lines, start, i)
}

/// Consumes a brace-depth-balanced template span.
///
/// Depth starts at the net `{{`/`}}` count of the first line and is
/// updated per line until it reaches zero. Nested templates (a URL
/// sub-template inside an infobox field, say) keep the depth positive
/// so their closing braces are not mistaken for the outer one.
pub fn template(lines: &[&str], start: usize) -> BlockSpan {
    let mut depth = Template::depth_delta(lines[start]);
    let mut i = start + 1;
    while i < lines.len() && depth > 0 {
        depth += Template::depth_delta(lines[i]);
        i += 1;
    }
    span(lines, start, i)
}

/// Consumes from the `<pre>` line through the first `</pre>` line inclusive.
pub fn code_block(lines: &[&str], start: usize) -> BlockSpan {
    if CodeBlock::closes(lines[start]) {
        return span(lines, start, start + 1);
    }
    let mut i = start + 1;
    while i < lines.len() {
        if CodeBlock::closes(lines[i]) {
            return span(lines, start, i + 1);
        }
        i += 1;
    }
    span(lines, start, lines.len())
}
