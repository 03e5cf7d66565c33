//! Markup-to-plain-text flattening.
//!
//! Strips the inline markup that matters for residual text production:
//! bold/italic quote runs, wiki links (keeping display text), external
//! link brackets (keeping the label), HTML tags, and any templates left
//! in the text after the extraction pass removed the structural ones.
//! Placeholder markers contain only letters, digits and underscores, so
//! they pass through untouched.

/// Flattens a markup fragment to plain text.
pub fn flatten(input: &str) -> String {
    let no_templates = strip_templates(input);
    let no_links = strip_wiki_links(&no_templates);
    let no_external = strip_external_links(&no_links);
    let no_tags = strip_html_tags(&no_external);
    no_tags.replace("'''", "").replace("''", "")
}

/// Removes `{{...}}` spans, depth-balanced so nested templates vanish
/// with their parent. An unclosed `{{` swallows the rest of the input,
/// mirroring the extractor's degrade-to-EOF policy.
fn strip_templates(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        // Byte scan: the delimiters are ASCII, and `end` only ever lands
        // just past a `}}`, so slicing stays on char boundaries.
        let bytes = rest.as_bytes();
        let mut depth = 0usize;
        let mut cursor = start;
        let mut end = rest.len();
        while cursor < bytes.len() {
            if bytes[cursor..].starts_with(b"{{") {
                depth += 1;
                cursor += 2;
            } else if bytes[cursor..].starts_with(b"}}") {
                depth -= 1;
                cursor += 2;
                if depth == 0 {
                    end = cursor;
                    break;
                }
            } else {
                cursor += 1;
            }
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// `[[target|display]]` becomes `display`, `[[target]]` becomes `target`.
fn strip_wiki_links(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("[[") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("]]") {
            Some(close) => {
                let inner = &after[..close];
                // Display text follows the last pipe.
                out.push_str(inner.rsplit('|').next().unwrap_or(inner));
                rest = &after[close + 2..];
            }
            None => {
                // Unclosed link: keep the raw text.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// `[http://url label]` becomes `label`; a bare `[http://url]` vanishes.
fn strip_external_links(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('[') {
        let after = &rest[start + 1..];
        let is_url = after.starts_with("http://")
            || after.starts_with("https://")
            || after.starts_with("ftp://");
        if !is_url {
            out.push_str(&rest[..start + 1]);
            rest = after;
            continue;
        }
        out.push_str(&rest[..start]);
        match after.find(']') {
            Some(close) => {
                let inner = &after[..close];
                if let Some((_, label)) = inner.split_once(' ') {
                    out.push_str(label);
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Removes `<...>` tags, keeping their inner text.
fn strip_html_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(close) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + close + 1..];
            }
            None => {
                out.push_str(rest);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_bold_and_italic_quotes() {
        assert_eq!(flatten("'''Ada''' was ''brilliant''."), "Ada was brilliant.");
    }

    #[test]
    fn wiki_links_keep_display_text() {
        assert_eq!(flatten("[[London]]"), "London");
        assert_eq!(flatten("born in [[London, England|London]]"), "born in London");
    }

    #[test]
    fn external_links_keep_label() {
        assert_eq!(flatten("[https://example.com Example site]"), "Example site");
        assert_eq!(flatten("see [https://example.com]"), "see ");
    }

    #[test]
    fn plain_brackets_survive() {
        assert_eq!(flatten("a [sic] remark"), "a [sic] remark");
    }

    #[test]
    fn leftover_templates_are_removed() {
        assert_eq!(flatten("text {{cn|date=2020}} more"), "text  more");
        assert_eq!(flatten("a {{outer|{{inner}}}} b"), "a  b");
    }

    #[test]
    fn html_tags_are_removed_keeping_content() {
        assert_eq!(flatten("<b>bold</b> text"), "bold text");
    }

    #[test]
    fn markers_pass_through_verbatim() {
        assert_eq!(flatten("__TABLE_42__\n\ntext"), "__TABLE_42__\n\ntext");
    }

    #[test]
    fn unclosed_template_swallows_rest() {
        assert_eq!(flatten("keep {{broken rest"), "keep ");
    }

    #[test]
    fn multibyte_text_inside_templates() {
        assert_eq!(flatten("a {{naïve|日本語}} b"), "a  b");
        assert_eq!(flatten("café [[Zürich]]"), "café Zürich");
    }
}
