//! The chunk sequencer: a single forward scan that drives the line
//! classifier and block extractors, appending typed chunks to a
//! [`ChunkList`].

use crate::chunks::{ChunkList, ChunkPayload};

use super::blocks;
use super::classify::{LineKind, WikiLineClassifier};
use super::fields;
use super::patterns::Table;

pub struct ChunkSequencer {
    classifier: WikiLineClassifier,
}

impl ChunkSequencer {
    pub fn new() -> Self {
        Self {
            classifier: WikiLineClassifier,
        }
    }

    /// Segments the input into an ordered chunk sequence.
    ///
    /// Blank lines never produce a chunk; whitespace-only paragraph
    /// spans are discarded. No backtracking: once an extractor returns
    /// an end index the scan resumes strictly after it.
    pub fn run(&self, input: &str) -> ChunkList {
        let lines: Vec<&str> = input.split('\n').collect();
        let mut out = ChunkList::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            match self.classifier.classify(line) {
                LineKind::Blank => {
                    i += 1;
                }
                LineKind::Heading { level, title } => {
                    out.push(
                        line.to_string(),
                        ChunkPayload::Heading {
                            level,
                            title: title.to_string(),
                        },
                    );
                    i += 1;
                }
                LineKind::InfoboxOpen => {
                    let span = blocks::template(&lines, i);
                    let data = fields::parse_infobox(&span.text);
                    out.push(
                        span.text,
                        ChunkPayload::Infobox {
                            infobox_type: data.infobox_type,
                            fields: data.fields,
                        },
                    );
                    i = span.end;
                }
                LineKind::TableOpen => {
                    let span = blocks::table(&lines, i);
                    let row_count = span.text.matches(Table::ROW_SEP).count();
                    out.push(span.text, ChunkPayload::Table { row_count });
                    i = span.end;
                }
                LineKind::ListItem { markers } => {
                    let level = markers.len() as u8;
                    // First marker char decides the list type.
                    let list_type = markers.chars().next().unwrap_or('*');
                    let span = blocks::list(&lines, i);
                    out.push(span.text, ChunkPayload::List { level, list_type });
                    i = span.end;
                }
                LineKind::HorizontalRule => {
                    out.push(line.to_string(), ChunkPayload::HorizontalRule);
                    i += 1;
                }
                LineKind::CodeOpen => {
                    let span = blocks::code_block(&lines, i);
                    out.push(span.text, ChunkPayload::CodeBlock);
                    i = span.end;
                }
                LineKind::Text => {
                    let span = blocks::paragraph(&lines, i);
                    // A structural stop on the very first line still advances.
                    let end = span.end.max(i + 1);
                    if !span.text.trim().is_empty() {
                        out.push(span.text, ChunkPayload::Paragraph);
                    }
                    i = end;
                }
            }
        }

        out
    }
}

impl Default for ChunkSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::ChunkKind;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<ChunkKind> {
        ChunkSequencer::new()
            .run(input)
            .iter()
            .map(|c| c.kind())
            .collect()
    }

    #[test]
    fn segments_mixed_document() {
        let input = "== Intro ==\n\nSome prose\nacross lines.\n\n* a\n* b\n\n----\n";
        assert_eq!(
            kinds(input),
            vec![
                ChunkKind::Heading,
                ChunkKind::Paragraph,
                ChunkKind::List,
                ChunkKind::HorizontalRule,
            ]
        );
    }

    #[test]
    fn blank_lines_produce_no_chunks() {
        assert_eq!(kinds(""), Vec::<ChunkKind>::new());
        assert_eq!(kinds("\n\n  \n"), Vec::<ChunkKind>::new());
    }

    #[test]
    fn blank_line_terminates_paragraph() {
        let list = ChunkSequencer::new().run("one\ntwo\n\nthree");
        let paras: Vec<_> = list.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(paras, vec!["one\ntwo", "three"]);
    }

    #[test]
    fn table_chunk_counts_rows() {
        let input = "{|\n! H1 !! H2\n|-\n| a || b\n|-\n| c || d\n|}";
        let list = ChunkSequencer::new().run(input);
        assert_eq!(list.len(), 1);
        let chunk = list.get(list.head().unwrap()).unwrap();
        assert_eq!(chunk.kind(), ChunkKind::Table);
        assert_eq!(chunk.payload, ChunkPayload::Table { row_count: 2 });
    }

    #[test]
    fn infobox_chunk_carries_fields() {
        let input = "{{Infobox person\n| name = Ada\n| field = maths\n}}\n\nProse.";
        let list = ChunkSequencer::new().run(input);
        assert_eq!(list.len(), 2);
        let chunk = list.get(list.head().unwrap()).unwrap();
        match &chunk.payload {
            ChunkPayload::Infobox {
                infobox_type,
                fields,
            } => {
                assert_eq!(infobox_type, "person");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected infobox payload, got {other:?}"),
        }
    }

    #[test]
    fn infobox_checked_before_generic_table() {
        // The infobox body contains `|`-prefixed lines a table rule
        // would also claim; the infobox wins at the opening line.
        let input = "{{Infobox person\n| name = Ada\n}}";
        assert_eq!(kinds(input), vec![ChunkKind::Infobox]);
    }

    #[test]
    fn list_chunk_records_first_marker() {
        let list = ChunkSequencer::new().run("** deep\n* shallow");
        let chunk = list.get(list.head().unwrap()).unwrap();
        assert_eq!(
            chunk.payload,
            ChunkPayload::List {
                level: 2,
                list_type: '*'
            }
        );
    }

    #[test]
    fn code_block_between_paragraphs() {
        let input = "before\n\n<pre>\nx = 1\n</pre>\n\nafter";
        assert_eq!(
            kinds(input),
            vec![ChunkKind::Paragraph, ChunkKind::CodeBlock, ChunkKind::Paragraph]
        );
    }

    #[test]
    fn heading_content_is_verbatim_line() {
        let list = ChunkSequencer::new().run("== Title ==");
        let chunk = list.get(list.head().unwrap()).unwrap();
        assert_eq!(chunk.content, "== Title ==");
        assert_eq!(
            chunk.payload,
            ChunkPayload::Heading {
                level: 2,
                title: "Title".to_string()
            }
        );
    }

    #[test]
    fn unterminated_infobox_consumes_to_eof() {
        let input = "{{Infobox person\n| name = Ada";
        let list = ChunkSequencer::new().run(input);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(list.head().unwrap()).unwrap().kind(), ChunkKind::Infobox);
    }

    #[test]
    fn stray_table_close_is_paragraph_material() {
        assert_eq!(kinds("|}\n"), vec![ChunkKind::Paragraph]);
    }
}
