use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};
use tracing_subscriber::EnvFilter;

use crate::config::CorpusConfig;
use crate::constants::archive::DEFAULT_URL_BASE;
use crate::dataset::DatasetName;
use crate::pipeline::CorpusPipeline;

#[derive(Debug, Parser)]
#[command(
    name = "librispeech_init",
    disable_help_subcommand = true,
    about = "Download LibriSpeech datasets and build their utterance indexes",
    long_about = "Ensure each selected LibriSpeech dataset is downloaded and extracted, then write a flat index of audio paths, transcriptions, and chapter ids to <root>/<dataset>/master.bin.",
    after_help = "The corpus root is resolved in order by --root, the LIBRISPEECH_DIR environment variable, then data/LibriSpeech."
)]
struct InitCli {
    #[arg(
        long = "dataset",
        value_enum,
        value_name = "NAME",
        help = "Dataset to process, repeat as needed"
    )]
    datasets: Vec<DatasetName>,
    #[arg(long, help = "Process every known dataset")]
    all: bool,
    #[arg(
        long,
        help = "Delete existing indexes for the selected datasets before rebuilding (corpus files are kept)"
    )]
    clean: bool,
    #[arg(long, value_name = "PATH", help = "Corpus root directory")]
    root: Option<PathBuf>,
    #[arg(
        long = "base-url",
        value_name = "URL",
        default_value = DEFAULT_URL_BASE,
        help = "Archive URL template; {} is replaced with <dataset>.tar.gz"
    )]
    base_url: String,
    #[arg(long, help = "Follow symlinks while walking dataset trees")]
    follow_links: bool,
    #[arg(long, help = "Report download progress and per-stage milestones")]
    verbose: bool,
}

impl InitCli {
    fn selected_datasets(&self) -> Vec<DatasetName> {
        if self.all {
            return DatasetName::ALL.to_vec();
        }
        let mut selected = Vec::with_capacity(self.datasets.len());
        for dataset in &self.datasets {
            if !selected.contains(dataset) {
                selected.push(*dataset);
            }
        }
        selected
    }

    fn corpus_config(&self) -> Result<CorpusConfig, Box<dyn Error>> {
        let config = match &self.root {
            Some(root) => CorpusConfig::new(root),
            None => CorpusConfig::from_env(),
        };
        Ok(config
            .with_base_url(self.base_url.clone())
            .with_follow_links(self.follow_links)
            .with_verbose(self.verbose)
            .validated()?)
    }
}

/// Parse `args_iter` (without the program name) and run clean/fetch/index.
pub fn run_initialize<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let Some(cli) = parse_cli::<InitCli, _>(
        std::iter::once("librispeech_init".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    init_tracing(cli.verbose);

    let datasets = cli.selected_datasets();
    if datasets.is_empty() {
        return Err("no datasets selected; pass --dataset <NAME> or --all".into());
    }
    let config = cli.corpus_config()?;
    println!("Corpus root: {}", config.root.display());
    println!(
        "Processing: {}",
        datasets
            .iter()
            .map(|dataset| dataset.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let pipeline = CorpusPipeline::new(config);
    if cli.clean {
        for path in pipeline.clean(&datasets)? {
            println!("Removed {}", path.display());
        }
    }

    for report in pipeline.initialize(&datasets)? {
        println!(
            "{}: {} utterances in {} groups -> {}{}",
            report.dataset,
            report.utterances,
            report.groups,
            report.index_path.display(),
            if report.fetched { " (downloaded)" } else { "" }
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> InitCli {
        InitCli::try_parse_from(std::iter::once("librispeech_init").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn repeated_datasets_are_deduplicated_in_order() {
        let cli = parse(&[
            "--dataset",
            "test-clean",
            "--dataset",
            "dev-clean",
            "--dataset",
            "test-clean",
        ]);
        assert_eq!(
            cli.selected_datasets(),
            vec![DatasetName::TestClean, DatasetName::DevClean]
        );
    }

    #[test]
    fn all_selects_every_dataset() {
        let cli = parse(&["--all", "--dataset", "dev-clean"]);
        assert_eq!(cli.selected_datasets(), DatasetName::ALL.to_vec());
    }

    #[test]
    fn unknown_dataset_is_a_usage_error() {
        let err = InitCli::try_parse_from(["librispeech_init", "--dataset", "dev_clean"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn explicit_root_and_flags_reach_config() {
        let cli = parse(&["--root", "/tmp/LibriSpeech", "--verbose", "--follow-links"]);
        let config = cli.corpus_config().unwrap();
        assert_eq!(config.root, PathBuf::from("/tmp/LibriSpeech"));
        assert!(config.verbose);
        assert!(config.follow_links);
        assert_eq!(config.base_url, DEFAULT_URL_BASE);
    }

    #[test]
    fn empty_selection_fails_before_any_work() {
        let args = ["--root", "/nonexistent/LibriSpeech"].map(String::from);
        let err = run_initialize(args.into_iter()).unwrap_err();
        assert!(err.to_string().contains("no datasets selected"));
    }
}
