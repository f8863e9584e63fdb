use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::CorpusError;

pub use crate::types::{GroupKey, Transcription, UtteranceId};

/// One transcript line resolved against its chapter directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utterance {
    /// Identifier from the first column of the transcript line.
    pub utterance_id: UtteranceId,
    /// Remaining text of the line with whitespace collapsed.
    pub transcription: Transcription,
    /// `<transcript dir>/<utterance_id>.flac`; existence is not checked.
    pub audio_path: PathBuf,
}

/// Borrowed view of one row of a [`CorpusIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry<'a> {
    /// Audio file the row refers to.
    pub path: &'a Path,
    /// Normalized utterance text.
    pub transcription: &'a str,
    /// Chapter directory the row came from.
    pub group_id: &'a str,
}

/// Flat utterance index for one dataset.
///
/// Rows are stored as three parallel sequences that always have equal length.
/// Rows keep insertion order: each transcript file contributes a contiguous run
/// in line order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    paths: Vec<PathBuf>,
    transcriptions: Vec<Transcription>,
    group_ids: Vec<GroupKey>,
}

impl CorpusIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from parallel sequences, rejecting mismatched lengths.
    pub fn from_parts(
        paths: Vec<PathBuf>,
        transcriptions: Vec<Transcription>,
        group_ids: Vec<GroupKey>,
    ) -> Result<Self, CorpusError> {
        if paths.len() != transcriptions.len() || paths.len() != group_ids.len() {
            return Err(CorpusError::Configuration(format!(
                "index sequences differ in length (paths={}, transcriptions={}, group_ids={})",
                paths.len(),
                transcriptions.len(),
                group_ids.len()
            )));
        }
        Ok(Self {
            paths,
            transcriptions,
            group_ids,
        })
    }

    /// Append one transcript file's rows under `group`.
    ///
    /// `transcriptions` and `audio_paths` must be index-aligned.
    pub fn extend_group(
        &mut self,
        group: &str,
        transcriptions: Vec<Transcription>,
        audio_paths: Vec<PathBuf>,
    ) -> Result<(), CorpusError> {
        if transcriptions.len() != audio_paths.len() {
            return Err(CorpusError::Configuration(format!(
                "group '{group}' has {} transcriptions but {} audio paths",
                transcriptions.len(),
                audio_paths.len()
            )));
        }
        self.group_ids
            .extend(std::iter::repeat_n(group.to_string(), audio_paths.len()));
        self.transcriptions.extend(transcriptions);
        self.paths.extend(audio_paths);
        Ok(())
    }

    /// Append a single utterance under `group`.
    pub fn push(&mut self, group: &str, utterance: Utterance) {
        self.paths.push(utterance.audio_path);
        self.transcriptions.push(utterance.transcription);
        self.group_ids.push(group.to_string());
    }

    /// Number of indexed utterances.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if no utterances are indexed.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Audio paths, one per row.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Transcriptions, one per row.
    pub fn transcriptions(&self) -> &[Transcription] {
        &self.transcriptions
    }

    /// Group keys, one per row.
    pub fn group_ids(&self) -> &[GroupKey] {
        &self.group_ids
    }

    /// Number of distinct group keys.
    pub fn group_count(&self) -> usize {
        self.group_ids
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Row at `idx`, if present.
    pub fn get(&self, idx: usize) -> Option<IndexEntry<'_>> {
        Some(IndexEntry {
            path: self.paths.get(idx)?,
            transcription: self.transcriptions.get(idx)?,
            group_id: self.group_ids.get(idx)?,
        })
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = IndexEntry<'_>> {
        self.paths
            .iter()
            .zip(&self.transcriptions)
            .zip(&self.group_ids)
            .map(|((path, transcription), group_id)| IndexEntry {
                path,
                transcription,
                group_id,
            })
    }

    /// Consume the index into `(paths, transcriptions, group_ids)`.
    pub fn into_parts(self) -> (Vec<PathBuf>, Vec<Transcription>, Vec<GroupKey>) {
        (self.paths, self.transcriptions, self.group_ids)
    }
}
