use std::fmt;
use std::str::FromStr;

use crate::constants::archive::ARCHIVE_SUFFIX;
use crate::errors::CorpusError;

/// Independently downloadable LibriSpeech splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum DatasetName {
    /// `dev-clean`
    DevClean,
    /// `dev-other`
    DevOther,
    /// `test-clean`
    TestClean,
    /// `test-other`
    TestOther,
    /// `train-clean-100`
    #[value(name = "train-clean-100")]
    TrainClean100,
    /// `train-clean-360`
    #[value(name = "train-clean-360")]
    TrainClean360,
    /// `train-other-500`
    #[value(name = "train-other-500")]
    TrainOther500,
}

impl DatasetName {
    /// Every known dataset, in canonical processing order.
    pub const ALL: [DatasetName; 7] = [
        DatasetName::DevClean,
        DatasetName::DevOther,
        DatasetName::TestClean,
        DatasetName::TestOther,
        DatasetName::TrainClean100,
        DatasetName::TrainClean360,
        DatasetName::TrainOther500,
    ];

    /// Directory name of the dataset once extracted.
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetName::DevClean => "dev-clean",
            DatasetName::DevOther => "dev-other",
            DatasetName::TestClean => "test-clean",
            DatasetName::TestOther => "test-other",
            DatasetName::TrainClean100 => "train-clean-100",
            DatasetName::TrainClean360 => "train-clean-360",
            DatasetName::TrainOther500 => "train-other-500",
        }
    }

    /// Archive file name published for this dataset (e.g. `dev-clean.tar.gz`).
    pub fn archive_file_name(self) -> String {
        format!("{}{}", self.as_str(), ARCHIVE_SUFFIX)
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetName {
    type Err = CorpusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        DatasetName::ALL
            .into_iter()
            .find(|name| name.as_str() == trimmed)
            .ok_or_else(|| CorpusError::UnknownDataset(value.to_string()))
    }
}
