use std::env;
use std::path::PathBuf;

use crate::constants::archive::{DEFAULT_URL_BASE, URL_PLACEHOLDER};
use crate::constants::config::{DEFAULT_ROOT, ROOT_ENV_VAR};
use crate::dataset::DatasetName;
use crate::errors::CorpusError;

/// Locations and switches shared by the fetch, build, and store stages.
#[derive(Clone, Debug)]
pub struct CorpusConfig {
    /// Corpus root; each dataset is extracted to `root/<dataset>`.
    pub root: PathBuf,
    /// Archive URL template; `{}` is replaced with `<dataset>.tar.gz`.
    pub base_url: String,
    /// Whether symlinks are followed while walking a dataset tree.
    pub follow_links: bool,
    /// Emit download progress and per-stage milestones at `info`.
    pub verbose: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl CorpusConfig {
    /// Create a config rooted at `root` with the public LibriSpeech mirror.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: DEFAULT_URL_BASE.to_string(),
            follow_links: false,
            verbose: false,
        }
    }

    /// Resolve the root from `LIBRISPEECH_DIR`, falling back to `data/LibriSpeech`.
    pub fn from_env() -> Self {
        match env::var_os(ROOT_ENV_VAR) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    /// Override the archive URL template.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Control whether symlinks are followed while walking.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Toggle progress and milestone output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the URL template carries exactly one placeholder.
    pub fn validated(self) -> Result<Self, CorpusError> {
        if self.base_url.matches(URL_PLACEHOLDER).count() != 1 {
            return Err(CorpusError::Configuration(format!(
                "archive URL template '{}' must contain exactly one '{}'",
                self.base_url, URL_PLACEHOLDER
            )));
        }
        Ok(self)
    }

    /// Directory the dataset is extracted to.
    pub fn dataset_root(&self, dataset: DatasetName) -> PathBuf {
        self.root.join(dataset.as_str())
    }

    /// Local path of the downloaded archive for `dataset`.
    pub fn archive_path(&self, dataset: DatasetName) -> PathBuf {
        self.root.join(dataset.archive_file_name())
    }

    /// Remote URL of the archive for `dataset`.
    pub fn archive_url(&self, dataset: DatasetName) -> String {
        self.base_url
            .replacen(URL_PLACEHOLDER, &dataset.archive_file_name(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn paths_are_derived_from_root() {
        let config = CorpusConfig::new("/corpus/LibriSpeech");
        assert_eq!(
            config.dataset_root(DatasetName::DevClean),
            Path::new("/corpus/LibriSpeech/dev-clean")
        );
        assert_eq!(
            config.archive_path(DatasetName::DevClean),
            Path::new("/corpus/LibriSpeech/dev-clean.tar.gz")
        );
    }

    #[test]
    fn archive_url_templates_file_name() {
        let config = CorpusConfig::new("root");
        assert_eq!(
            config.archive_url(DatasetName::TestOther),
            "http://www.openslr.org/resources/12/test-other.tar.gz"
        );

        let mirror = CorpusConfig::new("root").with_base_url("https://mirror.example/ls/{}");
        assert_eq!(
            mirror.archive_url(DatasetName::DevOther),
            "https://mirror.example/ls/dev-other.tar.gz"
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = CorpusConfig::new("root")
            .with_base_url("https://mirror.example/fixed.tar.gz")
            .validated()
            .unwrap_err();
        assert!(matches!(err, CorpusError::Configuration(_)));
        assert!(CorpusConfig::new("root").validated().is_ok());
    }
}
