//! Line-wise segmentation of wiki markup into typed content chunks.

pub mod blocks;
pub mod classify;
pub mod fields;
pub mod patterns;
pub mod sequencer;

use crate::chunks::ChunkList;

use sequencer::ChunkSequencer;

/// Hard failures of a whole parse run.
///
/// Malformed markup never lands here; extractors degrade instead.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// Segments a markup string into an ordered chunk sequence.
pub fn parse_document(input: &str) -> ChunkList {
    let chunks = ChunkSequencer::new().run(input);
    tracing::debug!(chunks = chunks.len(), "segmented document");
    chunks
}

/// Segments a raw byte buffer, failing the whole run on invalid UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<ChunkList, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(parse_document(text))
}
