use super::patterns::{CodeBlock, Heading, HorizontalRule, ListItem, Table, Template};

/// Classification of a single line containing only local facts.
///
/// Each line is classified independently; multi-line extent decisions
/// belong to the block extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, title: &'a str },
    InfoboxOpen,
    TableOpen,
    ListItem { markers: &'a str },
    HorizontalRule,
    CodeOpen,
    /// Paragraph material, including stray table-close lines.
    Text,
}

/// Classifies individual lines for the sequencing phase.
pub struct WikiLineClassifier;

impl WikiLineClassifier {
    /// Classifies a line, first match wins.
    ///
    /// Precedence: heading, infobox open, table open, list item,
    /// horizontal rule, code open, blank, text. Infobox must be checked
    /// before the generic table and list rules because `{{Infobox`
    /// bodies routinely contain lines those rules would also match.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some((level, title)) = Heading::parse(line) {
            return LineKind::Heading { level, title };
        }
        if Template::opens_infobox(line) {
            return LineKind::InfoboxOpen;
        }
        if Table::opens(line) {
            return LineKind::TableOpen;
        }
        if let Some(markers) = ListItem::markers(line) {
            return LineKind::ListItem { markers };
        }
        if HorizontalRule::matches(line) {
            return LineKind::HorizontalRule;
        }
        if CodeBlock::opens(line) {
            return LineKind::CodeOpen;
        }
        if line.trim().is_empty() {
            return LineKind::Blank;
        }
        LineKind::Text
    }
}
