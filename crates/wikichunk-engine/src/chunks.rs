//! The segmented document model: typed content chunks in an arena with
//! positional prev/next links.
//!
//! Chunks are addressed by stable [`ChunkId`] indices rather than
//! references, so the sequence has no ownership cycles and serializes
//! directly. Links are only ever written by [`ChunkList::push`], which
//! keeps them mutually consistent by construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable arena index of a chunk within one [`ChunkList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(usize);

/// The kind of a content chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Heading,
    Paragraph,
    Table,
    List,
    Infobox,
    HorizontalRule,
    CodeBlock,
}

/// Kind-specific chunk data.
///
/// One variant per kind, so kind invariants (an infobox always has a
/// type name, a table always has a row count) hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkPayload {
    Heading {
        /// Depth 1-6.
        level: u8,
        title: String,
    },
    Paragraph,
    Table {
        /// Number of `|-` row separators in the source.
        row_count: usize,
    },
    List {
        /// Nesting depth of the first item's marker run.
        level: u8,
        /// Leading marker character of the first item (`*`, `#`, `:`, `;`).
        list_type: char,
    },
    Infobox {
        infobox_type: String,
        fields: BTreeMap<String, String>,
    },
    HorizontalRule,
    CodeBlock,
}

impl ChunkPayload {
    pub fn kind(&self) -> ChunkKind {
        match self {
            ChunkPayload::Heading { .. } => ChunkKind::Heading,
            ChunkPayload::Paragraph => ChunkKind::Paragraph,
            ChunkPayload::Table { .. } => ChunkKind::Table,
            ChunkPayload::List { .. } => ChunkKind::List,
            ChunkPayload::Infobox { .. } => ChunkKind::Infobox,
            ChunkPayload::HorizontalRule => ChunkKind::HorizontalRule,
            ChunkPayload::CodeBlock => ChunkKind::CodeBlock,
        }
    }

    /// Heading depth or list nesting depth; `None` for other kinds.
    pub fn level(&self) -> Option<u8> {
        match self {
            ChunkPayload::Heading { level, .. } | ChunkPayload::List { level, .. } => Some(*level),
            _ => None,
        }
    }
}

/// One segmented unit of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    /// Verbatim source span, markup included.
    pub content: String,
    pub payload: ChunkPayload,
    prev: Option<ChunkId>,
    next: Option<ChunkId>,
}

impl ContentChunk {
    pub fn kind(&self) -> ChunkKind {
        self.payload.kind()
    }

    /// Arena index of the chunk immediately before this one.
    pub fn prev(&self) -> Option<ChunkId> {
        self.prev
    }

    /// Arena index of the chunk immediately after this one.
    pub fn next(&self) -> Option<ChunkId> {
        self.next
    }
}

/// Surrounding chunks for a given chunk, truncated at sequence bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkContext {
    /// In document order, nearest last.
    pub before: Vec<ChunkId>,
    pub current: ChunkId,
    /// In document order, nearest first.
    pub after: Vec<ChunkId>,
}

/// The ordered chunk sequence produced by one parse run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkList {
    chunks: Vec<ContentChunk>,
    head: Option<ChunkId>,
    tail: Option<ChunkId>,
}

impl ChunkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk at the tail, linking it to the current tail.
    pub fn push(&mut self, content: String, payload: ChunkPayload) -> ChunkId {
        let id = ChunkId(self.chunks.len());
        self.chunks.push(ContentChunk {
            content,
            payload,
            prev: self.tail,
            next: None,
        });
        if let Some(tail) = self.tail {
            self.chunks[tail.0].next = Some(id);
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        id
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn head(&self) -> Option<ChunkId> {
        self.head
    }

    pub fn tail(&self) -> Option<ChunkId> {
        self.tail
    }

    pub fn get(&self, id: ChunkId) -> Option<&ContentChunk> {
        self.chunks.get(id.0)
    }

    /// The chunk immediately before the given chunk.
    pub fn before(&self, id: ChunkId) -> Option<ChunkId> {
        self.get(id)?.prev
    }

    /// The chunk immediately after the given chunk.
    pub fn after(&self, id: ChunkId) -> Option<ChunkId> {
        self.get(id)?.next
    }

    /// Ids of all chunks of the given kind, in document order.
    pub fn by_kind(&self, kind: ChunkKind) -> Vec<ChunkId> {
        self.iter_ids()
            .filter(|&id| self.chunks[id.0].kind() == kind)
            .collect()
    }

    /// Up to `before`/`after` chunks around `id`, truncated at the
    /// sequence boundaries rather than erroring.
    pub fn context(&self, id: ChunkId, before: usize, after: usize) -> Option<ChunkContext> {
        self.get(id)?;
        let mut ctx = ChunkContext {
            before: Vec::new(),
            current: id,
            after: Vec::new(),
        };
        let mut cur = self.before(id);
        for _ in 0..before {
            let Some(c) = cur else { break };
            ctx.before.insert(0, c);
            cur = self.before(c);
        }
        let mut cur = self.after(id);
        for _ in 0..after {
            let Some(c) = cur else { break };
            ctx.after.push(c);
            cur = self.after(c);
        }
        Some(ctx)
    }

    /// Iterates chunks in document order by following next links.
    pub fn iter(&self) -> impl Iterator<Item = &ContentChunk> {
        self.iter_ids().map(|id| &self.chunks[id.0])
    }

    /// Iterates chunk ids in document order by following next links.
    pub fn iter_ids(&self) -> ChunkIds<'_> {
        ChunkIds {
            list: self,
            cursor: self.head,
        }
    }

    /// Iterates chunk ids in reverse order by following prev links.
    pub fn iter_ids_rev(&self) -> impl Iterator<Item = ChunkId> {
        let mut cursor = self.tail;
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = self.chunks[id.0].prev;
            Some(id)
        })
    }
}

/// Forward id iterator over a [`ChunkList`].
pub struct ChunkIds<'a> {
    list: &'a ChunkList,
    cursor: Option<ChunkId>,
}

impl Iterator for ChunkIds<'_> {
    type Item = ChunkId;

    fn next(&mut self) -> Option<ChunkId> {
        let id = self.cursor?;
        self.cursor = self.list.chunks[id.0].next;
        Some(id)
    }
}
