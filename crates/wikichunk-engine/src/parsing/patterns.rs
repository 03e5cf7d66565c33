//! Line-level recognizers for wiki markup constructs.
//!
//! Each recognizer is a pure predicate over a single line. Precedence
//! between overlapping recognizers is decided in [`super::classify`],
//! not here.

/// Heading of the form `==` title `==` with symmetric delimiters.
pub struct Heading;

impl Heading {
    pub const MAX_LEVEL: usize = 6;

    /// Parses a heading line, returning `(level, title)`.
    ///
    /// The delimiter runs must be the same length on both sides and
    /// between 1 and 6 equals signs. The title is trimmed.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let t = line.trim_end();
        let lead = t.chars().take_while(|&c| c == '=').count();
        if lead == 0 || lead > Self::MAX_LEVEL {
            return None;
        }
        let rest = &t[lead..];
        let trail = rest.chars().rev().take_while(|&c| c == '=').count();
        if trail != lead {
            return None;
        }
        Some((lead as u8, rest[..rest.len() - trail].trim()))
    }
}

/// MediaWiki table delimiters: `{|` opens, `|}` closes.
pub struct Table;

impl Table {
    pub const OPEN: &'static str = "{|";
    pub const CLOSE: &'static str = "|}";
    /// Row separator inside a table body.
    pub const ROW_SEP: &'static str = "|-";

    pub fn opens(line: &str) -> bool {
        line.starts_with(Self::OPEN)
    }

    pub fn closes(line: &str) -> bool {
        line.starts_with(Self::CLOSE)
    }
}

/// Double-brace template syntax, including the infobox special case.
pub struct Template;

impl Template {
    pub const OPEN: &'static str = "{{";
    pub const CLOSE: &'static str = "}}";
    pub const INFOBOX: &'static str = "infobox";

    /// True when the line contains `{{` followed by an identifier that
    /// begins with `infobox` (case-insensitive).
    pub fn opens_infobox(line: &str) -> bool {
        let Some(pos) = line.find(Self::OPEN) else {
            return false;
        };
        let after = line[pos + Self::OPEN.len()..].trim_start();
        after.len() >= Self::INFOBOX.len()
            && after[..Self::INFOBOX.len()].eq_ignore_ascii_case(Self::INFOBOX)
    }

    /// Net brace depth change contributed by one line.
    ///
    /// Counts literal `{{` and `}}` occurrences. Literal braces inside
    /// display text are counted too; that miscount is part of the
    /// documented extent semantics for templates.
    pub fn depth_delta(line: &str) -> i32 {
        line.matches(Self::OPEN).count() as i32 - line.matches(Self::CLOSE).count() as i32
    }
}

/// List item lines: one or more of `*`, `#`, `:`, `;` at line start.
pub struct ListItem;

impl ListItem {
    /// Returns the leading marker run, e.g. `**` or `#:`.
    pub fn markers(line: &str) -> Option<&str> {
        let end = line
            .char_indices()
            .take_while(|&(_, c)| matches!(c, '*' | '#' | ':' | ';'))
            .map(|(i, c)| i + c.len_utf8())
            .last()?;
        Some(&line[..end])
    }

    pub fn matches(line: &str) -> bool {
        Self::markers(line).is_some()
    }
}

/// Horizontal rule: four or more dashes, optional trailing whitespace.
pub struct HorizontalRule;

impl HorizontalRule {
    pub const MIN_DASHES: usize = 4;

    pub fn matches(line: &str) -> bool {
        let t = line.trim_end();
        t.len() >= Self::MIN_DASHES && t.chars().all(|c| c == '-')
    }
}

/// Preformatted code blocks delimited by `<pre>` / `</pre>` tags.
pub struct CodeBlock;

impl CodeBlock {
    pub const OPEN: &'static str = "<pre>";
    pub const CLOSE: &'static str = "</pre>";

    pub fn opens(line: &str) -> bool {
        line.contains(Self::OPEN)
    }

    pub fn closes(line: &str) -> bool {
        line.contains(Self::CLOSE)
    }
}
