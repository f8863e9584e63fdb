use std::path::PathBuf;

use tracing::info;

use crate::config::CorpusConfig;
use crate::corpus::IndexBuilder;
use crate::dataset::DatasetName;
use crate::errors::CorpusError;
use crate::fetch::{ArchiveFetcher, FetchOutcome};
use crate::store::IndexStore;
use crate::transport::http::Downloader;

/// Summary of one dataset processed by [`CorpusPipeline::initialize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetReport {
    /// Dataset this report describes.
    pub dataset: DatasetName,
    /// Location of the saved index.
    pub index_path: PathBuf,
    /// Indexed utterance count.
    pub utterances: usize,
    /// Distinct group ids.
    pub groups: usize,
    /// True when the archive had to be extracted during this run.
    pub fetched: bool,
}

/// Fetch, build, and persist indexes for a list of datasets.
///
/// Datasets are processed in the given order, one at a time. The first
/// failure stops the run; datasets completed before it keep their indexes.
pub struct CorpusPipeline {
    fetcher: ArchiveFetcher,
    builder: IndexBuilder,
    store: IndexStore,
}

impl CorpusPipeline {
    /// Pipeline downloading over HTTP.
    pub fn new(config: CorpusConfig) -> Self {
        let builder = IndexBuilder::from_config(&config);
        Self {
            fetcher: ArchiveFetcher::new(config),
            builder,
            store: IndexStore::new(),
        }
    }

    /// Pipeline with a custom archive byte source.
    pub fn with_downloader(config: CorpusConfig, downloader: impl Downloader + 'static) -> Self {
        let builder = IndexBuilder::from_config(&config);
        Self {
            fetcher: ArchiveFetcher::with_downloader(config, downloader),
            builder,
            store: IndexStore::new(),
        }
    }

    /// Active corpus configuration.
    pub fn config(&self) -> &CorpusConfig {
        self.fetcher.config()
    }

    /// Store used for saving and cleaning indexes.
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Ensure, build, and save each dataset in order.
    pub fn initialize(&self, datasets: &[DatasetName]) -> Result<Vec<DatasetReport>, CorpusError> {
        let mut reports = Vec::with_capacity(datasets.len());
        for &dataset in datasets {
            let report = self
                .initialize_one(dataset)
                .map_err(|err| err.in_dataset(dataset))?;
            reports.push(report);
        }
        Ok(reports)
    }

    fn initialize_one(&self, dataset: DatasetName) -> Result<DatasetReport, CorpusError> {
        let outcome = self.fetcher.ensure_available(dataset, None)?;
        let dataset_root = self.config().dataset_root(dataset);
        if self.config().verbose {
            info!(dataset = %dataset, root = %dataset_root.display(), "indexing dataset");
        }
        let index = self.builder.build(&dataset_root)?;
        let index_path = self.store.save(&dataset_root, &index)?;
        Ok(DatasetReport {
            dataset,
            index_path,
            utterances: index.len(),
            groups: index.group_count(),
            fetched: matches!(outcome, FetchOutcome::Fetched { .. }),
        })
    }

    /// Remove persisted indexes for `datasets`; returns the removed files.
    pub fn clean(&self, datasets: &[DatasetName]) -> Result<Vec<PathBuf>, CorpusError> {
        let mut removed = Vec::new();
        for &dataset in datasets {
            let dataset_root = self.config().dataset_root(dataset);
            if self
                .store
                .clean(&dataset_root)
                .map_err(|err| err.in_dataset(dataset))?
            {
                removed.push(self.store.index_path(&dataset_root));
            }
        }
        Ok(removed)
    }
}
