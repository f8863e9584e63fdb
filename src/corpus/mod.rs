//! Corpus traversal, transcript parsing, and index construction.
//!
//! The expected layout is `dataset/<reader>/<chapter>/` where each chapter
//! directory holds one `<reader>-<chapter>.trans.txt` and the `.flac` files
//! it references.

/// Flat index construction over a dataset tree.
pub mod index;
/// Transcript file parsing.
pub mod transcript;
/// Leaf-directory discovery and grouping.
pub mod walker;

pub use index::IndexBuilder;
pub use transcript::{ParsedTranscript, TranscriptParser};
pub use walker::{CorpusWalker, TranscriptGroups, group_leaves};
