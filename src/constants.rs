/// Constants used by archive download and extraction.
pub mod archive {
    /// Base URL template for LibriSpeech archives; `{}` receives the archive file name.
    pub const DEFAULT_URL_BASE: &str = "http://www.openslr.org/resources/12/{}";
    /// Placeholder substituted in URL templates.
    pub const URL_PLACEHOLDER: &str = "{}";
    /// Suffix appended to a dataset name to form its archive file name.
    pub const ARCHIVE_SUFFIX: &str = ".tar.gz";
    /// Extension used for in-flight downloads before they are renamed into place.
    pub const PARTIAL_EXTENSION: &str = "part";
    /// Read buffer size used while streaming archive bodies to disk.
    pub const DOWNLOAD_BUFFER_BYTES: usize = 1024 * 1024;
    /// Minimum interval between verbose progress log lines.
    pub const PROGRESS_LOG_INTERVAL_SECS: u64 = 2;
}

/// Constants describing the on-disk corpus layout.
pub mod corpus {
    /// Extension identifying transcript files inside leaf directories.
    pub const TRANSCRIPT_EXTENSION: &str = "txt";
    /// Extension appended to utterance ids to form audio paths.
    pub const AUDIO_EXTENSION: &str = "flac";
}

/// Constants used by index persistence and wire encoding.
pub mod store {
    /// File name of the persisted index inside a dataset root.
    pub const MASTER_FILENAME: &str = "master.bin";
    /// Extension used for the temporary file written before an atomic rename.
    pub const TEMP_EXTENSION: &str = "tmp";
    /// Prefix marker for bitcode-encoded payloads.
    pub const BITCODE_PREFIX: u8 = b'B';
    /// Version tag for persisted index records.
    pub const INDEX_FORMAT_VERSION: u8 = 1;
}

/// Constants used by configuration resolution.
pub mod config {
    /// Environment variable overriding the corpus root directory.
    pub const ROOT_ENV_VAR: &str = "LIBRISPEECH_DIR";
    /// Corpus root used when no override is provided.
    pub const DEFAULT_ROOT: &str = "data/LibriSpeech";
}
