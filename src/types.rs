/// Leaf-directory basename used to group utterances.
/// Example: `198` (a LibriSpeech chapter id under reader `19`)
pub type GroupKey = String;
/// Utterance identifier, unique within its transcript file.
/// Example: `19-198-0001`
pub type UtteranceId = String;
/// Normalized transcription text.
/// Example: `NORTHANGER ABBEY`
pub type Transcription = String;
/// UTF-8 path string used in persisted index records.
/// Example: `data/LibriSpeech/dev-clean/19/198/19-198-0001.flac`
pub type PathString = String;
