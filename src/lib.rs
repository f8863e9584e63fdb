#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner used by the `librispeech_init` binary.
pub mod app;
/// Corpus configuration (roots, archive URL template, walk switches).
pub mod config;
/// Centralized constants for archives, corpus layout, and index files.
pub mod constants;
/// Corpus traversal, transcript parsing, and index construction.
pub mod corpus;
/// Utterance and corpus index types.
pub mod data;
/// Known LibriSpeech dataset names.
pub mod dataset;
/// Archive download and extraction.
pub mod fetch;
/// Ordered per-dataset fetch, build, and save driver.
pub mod pipeline;
/// Persisted index storage.
pub mod store;
/// Filesystem and network transports.
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text and path helpers.
pub mod utils;

mod errors;

pub use config::CorpusConfig;
pub use corpus::{CorpusWalker, IndexBuilder, TranscriptParser};
pub use data::{CorpusIndex, IndexEntry, Utterance};
pub use dataset::DatasetName;
pub use errors::CorpusError;
pub use fetch::{ArchiveFetcher, FetchOutcome};
pub use pipeline::{CorpusPipeline, DatasetReport};
pub use store::IndexStore;
pub use transport::http::{DownloadProgress, Downloader, HttpDownloader};
pub use types::{GroupKey, PathString, Transcription, UtteranceId};
