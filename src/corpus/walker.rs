use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::CorpusError;
use crate::transport::fs::{LeafDirectory, LeafDirectoryWalk};
use crate::types::GroupKey;
use crate::utils::basename;

/// Transcript files per group key, in first-discovery order.
pub type TranscriptGroups = IndexMap<GroupKey, Vec<PathBuf>>;

/// Locates transcript files in a dataset tree and groups them by leaf directory.
///
/// The group key is the leaf directory's basename. In LibriSpeech that is the
/// chapter id, so two readers with the same chapter id share one key.
#[derive(Clone, Debug, Default)]
pub struct CorpusWalker {
    follow_links: bool,
}

impl CorpusWalker {
    /// Walker that does not follow symlinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Control whether symlinks are followed while walking.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Every leaf directory under `dataset_root`, in sorted pre-order.
    pub fn leaf_directories(&self, dataset_root: &Path) -> Result<Vec<LeafDirectory>, CorpusError> {
        if !dataset_root.is_dir() {
            return Err(CorpusError::DatasetMissing {
                path: dataset_root.to_path_buf(),
            });
        }
        LeafDirectoryWalk::new(dataset_root)
            .with_follow_symlinks(self.follow_links)
            .collect()
    }

    /// Map each group key to its transcript files.
    pub fn group_transcript_files(
        &self,
        dataset_root: &Path,
    ) -> Result<TranscriptGroups, CorpusError> {
        let groups = group_leaves(self.leaf_directories(dataset_root)?)?;
        debug!(
            root = %dataset_root.display(),
            groups = groups.len(),
            "grouped transcript files"
        );
        Ok(groups)
    }
}

/// Group leaf directories by basename, selecting one transcript per leaf.
///
/// When a leaf holds several transcript candidates the first in listing order
/// wins and the rest are ignored. A leaf without any candidate is an error.
pub fn group_leaves<I>(leaves: I) -> Result<TranscriptGroups, CorpusError>
where
    I: IntoIterator<Item = LeafDirectory>,
{
    let mut groups = TranscriptGroups::new();
    for leaf in leaves {
        let mut candidates = leaf.transcripts.into_iter();
        let Some(transcript) = candidates.next() else {
            return Err(CorpusError::MalformedCorpus {
                path: leaf.path,
                details: "leaf directory has no transcript file".to_string(),
            });
        };
        for ignored in candidates {
            debug!(
                dir = %leaf.path.display(),
                selected = %transcript.display(),
                ignored = %ignored.display(),
                "ignoring extra transcript file"
            );
        }
        groups
            .entry(basename(&leaf.path))
            .or_default()
            .push(transcript);
    }
    Ok(groups)
}
