//! Idempotent download and extraction of dataset archives.
//!
//! A dataset is considered present once `root/<dataset>` exists; nothing is
//! fetched in that case. Downloads land in `root/<dataset>.tar.gz.part` and are
//! renamed on completion, so an existing `root/<dataset>.tar.gz` is always a
//! complete archive and is extracted without downloading again.
//!
//! When extraction fails the archive and any partially extracted dataset tree
//! are removed, so the next call starts over with a fresh download.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use flate2::read::GzDecoder;
use tracing::{info, warn};

use crate::config::CorpusConfig;
use crate::constants::archive::{PARTIAL_EXTENSION, PROGRESS_LOG_INTERVAL_SECS};
use crate::dataset::DatasetName;
use crate::errors::CorpusError;
use crate::transport::http::{DownloadProgress, Downloader, HttpDownloader};

/// What `ensure_available` had to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The dataset directory already existed.
    AlreadyPresent,
    /// The archive was extracted; `downloaded_bytes` is zero when a complete
    /// archive was already on disk.
    Fetched {
        /// Archive the dataset was extracted from.
        archive: PathBuf,
        /// Bytes downloaded during this call.
        downloaded_bytes: u64,
    },
}

/// Ensures dataset archives are downloaded and extracted under the corpus root.
pub struct ArchiveFetcher {
    config: CorpusConfig,
    downloader: Box<dyn Downloader>,
}

impl ArchiveFetcher {
    /// Fetcher using the HTTP downloader.
    pub fn new(config: CorpusConfig) -> Self {
        Self::with_downloader(config, HttpDownloader::default())
    }

    /// Fetcher using a custom byte source.
    pub fn with_downloader(config: CorpusConfig, downloader: impl Downloader + 'static) -> Self {
        Self {
            config,
            downloader: Box::new(downloader),
        }
    }

    /// Active corpus configuration.
    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Make sure `root/<dataset>` exists, downloading and extracting if needed.
    ///
    /// `progress` receives byte counters after every downloaded chunk.
    pub fn ensure_available(
        &self,
        dataset: DatasetName,
        progress: Option<&mut dyn FnMut(DownloadProgress)>,
    ) -> Result<FetchOutcome, CorpusError> {
        let root = &self.config.root;
        if !root.exists() {
            if self.config.verbose {
                info!(root = %root.display(), "corpus root missing, creating it");
            }
            fs::create_dir_all(root)
                .map_err(|err| fetch_error(dataset, "create corpus root", root, err))?;
        }

        let dataset_root = self.config.dataset_root(dataset);
        if dataset_root.exists() {
            if self.config.verbose {
                info!(dataset = %dataset, "dataset found, skipping download");
            }
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let archive = self.config.archive_path(dataset);
        let downloaded_bytes = if archive.is_file() {
            if self.config.verbose {
                info!(
                    dataset = %dataset,
                    archive = %archive.display(),
                    "archive already downloaded, extracting"
                );
            }
            0
        } else {
            self.download(dataset, &archive, progress)?
        };

        if let Err(err) = self.extract_and_verify(dataset, &archive, &dataset_root) {
            discard_failed_extraction(&archive, &dataset_root);
            return Err(err);
        }
        Ok(FetchOutcome::Fetched {
            archive,
            downloaded_bytes,
        })
    }

    fn extract_and_verify(
        &self,
        dataset: DatasetName,
        archive: &Path,
        dataset_root: &Path,
    ) -> Result<(), CorpusError> {
        self.extract(dataset, archive)?;
        if !dataset_root.is_dir() {
            return Err(CorpusError::Fetch {
                dataset,
                reason: format!(
                    "extracting {} did not produce {}",
                    archive.display(),
                    dataset_root.display()
                ),
            });
        }
        Ok(())
    }

    fn download(
        &self,
        dataset: DatasetName,
        archive: &Path,
        progress: Option<&mut dyn FnMut(DownloadProgress)>,
    ) -> Result<u64, CorpusError> {
        let url = self.config.archive_url(dataset);
        let partial = partial_path(archive);
        if partial.exists() {
            warn!(path = %partial.display(), "removing stale partial download");
            fs::remove_file(&partial)
                .map_err(|err| fetch_error(dataset, "remove stale download", &partial, err))?;
        }

        if self.config.verbose {
            info!(dataset = %dataset, url = %url, "dataset not found, downloading");
        }
        let mut file = File::create(&partial)
            .map_err(|err| fetch_error(dataset, "create download target", &partial, err))?;

        let verbose = self.config.verbose;
        let started = Instant::now();
        let mut last_report = Instant::now();
        let mut caller = progress;
        let mut report = |update: DownloadProgress| {
            if let Some(callback) = caller.as_deref_mut() {
                callback(update);
            }
            if verbose && last_report.elapsed() >= Duration::from_secs(PROGRESS_LOG_INTERVAL_SECS)
            {
                log_progress(dataset, update, started);
                last_report = Instant::now();
            }
        };
        let bytes = self
            .downloader
            .download(&url, &mut file, &mut report)
            .map_err(|err| CorpusError::Fetch {
                dataset,
                reason: format!("download from '{url}' failed: {err}"),
            })?;
        file.sync_all()
            .map_err(|err| fetch_error(dataset, "flush download", &partial, err))?;
        drop(file);

        fs::rename(&partial, archive)
            .map_err(|err| fetch_error(dataset, "move finished download into", archive, err))?;
        if verbose {
            let mib = bytes as f64 / (1024.0 * 1024.0);
            let secs = started.elapsed().as_secs_f64();
            info!(
                dataset = %dataset,
                archive = %archive.display(),
                mib,
                secs,
                "download complete"
            );
        }
        Ok(bytes)
    }

    fn extract(&self, dataset: DatasetName, archive: &Path) -> Result<(), CorpusError> {
        let destination = extraction_base(&self.config.root);
        if self.config.verbose {
            info!(
                archive = %archive.display(),
                destination = %destination.display(),
                "extracting archive"
            );
        }
        let file = File::open(archive)
            .map_err(|err| fetch_error(dataset, "open archive", archive, err))?;
        let mut tarball = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        tarball
            .unpack(&destination)
            .map_err(|err| fetch_error(dataset, "extract archive", archive, err))
    }
}

/// Drop the archive and any partial tree so the next call downloads again.
fn discard_failed_extraction(archive: &Path, dataset_root: &Path) {
    match fs::remove_file(archive) {
        Ok(()) => warn!(archive = %archive.display(), "removed unusable archive"),
        Err(err) => warn!(
            archive = %archive.display(),
            error = %err,
            "failed to remove unusable archive"
        ),
    }
    if dataset_root.exists()
        && let Err(err) = fs::remove_dir_all(dataset_root)
    {
        warn!(
            path = %dataset_root.display(),
            error = %err,
            "failed to remove partially extracted dataset"
        );
    }
}

fn log_progress(dataset: DatasetName, update: DownloadProgress, started: Instant) {
    let mib = update.bytes_fetched as f64 / (1024.0 * 1024.0);
    let elapsed = started.elapsed().as_secs_f64();
    match update.fraction() {
        Some(fraction) => info!(
            dataset = %dataset,
            "download progress: {:.1}% ({mib:.1} MiB, {elapsed:.1}s)",
            fraction * 100.0
        ),
        None => info!(dataset = %dataset, "download progress: {mib:.1} MiB ({elapsed:.1}s)"),
    }
}

/// Archives are rooted at the corpus directory name (`LibriSpeech/<dataset>/…`),
/// so they unpack into the root's parent.
fn extraction_base(root: &Path) -> PathBuf {
    match root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn partial_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_EXTENSION);
    PathBuf::from(name)
}

fn fetch_error(
    dataset: DatasetName,
    action: &str,
    path: &Path,
    err: std::io::Error,
) -> CorpusError {
    CorpusError::Fetch {
        dataset,
        reason: format!("failed to {action} {}: {err}", path.display()),
    }
}
