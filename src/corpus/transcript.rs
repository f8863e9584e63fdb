use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::corpus::AUDIO_EXTENSION;
use crate::data::Utterance;
use crate::errors::CorpusError;
use crate::types::Transcription;
use crate::utils::{normalize_inline_whitespace, split_first_token};

/// Index-aligned columns parsed from one transcript file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// Normalized text per line.
    pub transcriptions: Vec<Transcription>,
    /// Audio path per line, in the transcript's directory.
    pub audio_paths: Vec<PathBuf>,
}

impl ParsedTranscript {
    /// Number of parsed lines.
    pub fn len(&self) -> usize {
        self.audio_paths.len()
    }

    /// True if the transcript had no utterance lines.
    pub fn is_empty(&self) -> bool {
        self.audio_paths.is_empty()
    }
}

/// Parses `<utterance-id> <text…>` transcript files.
#[derive(Clone, Debug)]
pub struct TranscriptParser {
    audio_extension: String,
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self {
            audio_extension: AUDIO_EXTENSION.to_string(),
        }
    }
}

impl TranscriptParser {
    /// Parser producing `.flac` audio paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the extension appended to utterance ids (without the dot).
    pub fn with_audio_extension(mut self, extension: impl Into<String>) -> Self {
        self.audio_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Parse `transcript_path` into transcription and audio-path columns.
    pub fn parse(&self, transcript_path: &Path) -> Result<ParsedTranscript, CorpusError> {
        let mut parsed = ParsedTranscript::default();
        self.for_each_utterance(transcript_path, |utterance| {
            parsed.transcriptions.push(utterance.transcription);
            parsed.audio_paths.push(utterance.audio_path);
        })?;
        Ok(parsed)
    }

    /// Parse `transcript_path` into utterance records.
    pub fn parse_utterances(&self, transcript_path: &Path) -> Result<Vec<Utterance>, CorpusError> {
        let mut utterances = Vec::new();
        self.for_each_utterance(transcript_path, |utterance| utterances.push(utterance))?;
        Ok(utterances)
    }

    fn for_each_utterance<F>(&self, transcript_path: &Path, mut emit: F) -> Result<(), CorpusError>
    where
        F: FnMut(Utterance),
    {
        let parent = transcript_path.parent().unwrap_or_else(|| Path::new(""));
        let reader = BufReader::new(File::open(transcript_path)?);
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|err| match err.kind() {
                io::ErrorKind::InvalidData => CorpusError::Parse {
                    path: transcript_path.to_path_buf(),
                    line: line_no,
                    details: "line is not valid UTF-8".to_string(),
                },
                _ => CorpusError::Io(err),
            })?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let utterance = self
                .parse_line(parent, line)
                .map_err(|details| CorpusError::Parse {
                    path: transcript_path.to_path_buf(),
                    line: line_no,
                    details,
                })?;
            emit(utterance);
        }
        Ok(())
    }

    fn parse_line(&self, parent: &Path, line: &str) -> Result<Utterance, String> {
        let (utterance_id, rest) =
            split_first_token(line).ok_or_else(|| "missing utterance id".to_string())?;
        if utterance_id == "."
            || utterance_id == ".."
            || utterance_id.contains(|ch: char| ch == '/' || ch == '\\')
        {
            return Err(format!(
                "utterance id '{utterance_id}' does not name a file in the transcript directory"
            ));
        }
        Ok(Utterance {
            utterance_id: utterance_id.to_string(),
            transcription: normalize_inline_whitespace(rest),
            audio_path: parent.join(format!("{utterance_id}.{}", self.audio_extension)),
        })
    }
}
