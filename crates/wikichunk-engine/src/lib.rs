pub mod chunks;
pub mod extract;
pub mod io;
pub mod parsing;
pub mod review;

// Re-export key types for easier usage
pub use chunks::{ChunkContext, ChunkId, ChunkKind, ChunkList, ChunkPayload, ContentChunk};
pub use extract::{
    Category, ContextOptions, ElementPayload, ExtractError, ExtractedElement, Extraction,
    extract_elements, get_context,
};
pub use parsing::{ParseError, parse_bytes, parse_document};
pub use review::{AssessmentRequest, Collaborator, screen_registry};
