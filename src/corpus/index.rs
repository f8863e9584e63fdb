use std::path::Path;

use tracing::{debug, info};

use crate::config::CorpusConfig;
use crate::corpus::transcript::TranscriptParser;
use crate::corpus::walker::CorpusWalker;
use crate::data::CorpusIndex;
use crate::errors::CorpusError;

/// Builds a [`CorpusIndex`] for one dataset tree.
///
/// Groups are visited in first-discovery order and each group's transcripts in
/// discovery order, so rows of one transcript file stay contiguous.
#[derive(Clone, Debug, Default)]
pub struct IndexBuilder {
    walker: CorpusWalker,
    parser: TranscriptParser,
}

impl IndexBuilder {
    /// Builder with default walk and parse settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using the walk settings from `config`.
    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new().with_walker(CorpusWalker::new().with_follow_links(config.follow_links))
    }

    /// Replace the directory walker.
    pub fn with_walker(mut self, walker: CorpusWalker) -> Self {
        self.walker = walker;
        self
    }

    /// Walk `dataset_root` and index every transcript line.
    ///
    /// Any walk or parse failure aborts the build; no partial index is returned.
    pub fn build(&self, dataset_root: &Path) -> Result<CorpusIndex, CorpusError> {
        let groups = self.walker.group_transcript_files(dataset_root)?;
        let mut index = CorpusIndex::new();
        for (group, transcripts) in &groups {
            for transcript in transcripts {
                let parsed = self.parser.parse(transcript)?;
                debug!(
                    group = %group,
                    transcript = %transcript.display(),
                    utterances = parsed.len(),
                    "indexed transcript"
                );
                index.extend_group(group, parsed.transcriptions, parsed.audio_paths)?;
            }
        }
        info!(
            root = %dataset_root.display(),
            utterances = index.len(),
            groups = groups.len(),
            "built corpus index"
        );
        Ok(index)
    }
}
