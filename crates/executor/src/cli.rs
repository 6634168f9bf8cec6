//! Command line of `cycle-finder` and its merge with the loaded configuration.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::config::Config;
use super::error::Error;
use super::types::DataSource;
use cycle_core::CycleLimit;

/// Where the relationship graph is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// A delimited `source;target;type` file given as INPUT.
    Csv,
    /// A randomly generated graph sized by the `[simulator]` configuration.
    Sim,
}

/// Enumerates the elementary cycles of a directed relationship graph.
#[derive(Debug, Parser)]
#[command(name = "cycle-finder", version, about)]
pub struct Cli {
    /// Data source.
    #[arg(value_enum)]
    pub source: SourceKind,

    /// Relationship file, required for `csv`.
    pub input: Option<PathBuf>,

    /// File the cycles are appended to, one per line.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Maximum cycle length; negative means unbounded.
    #[arg(long, allow_hyphen_values = true)]
    pub limit_length: Option<String>,

    /// Apply the length limit only to vertices of this category.
    #[arg(long)]
    pub limit_category: Option<String>,

    /// Stop after this many cycles have been written.
    #[arg(long)]
    pub max_cycles: Option<usize>,

    /// Configuration file (TOML).
    #[arg(short, long, env = "CYCLES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for the `sim` source.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Everything the pipeline needs, after command-line values override configuration.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub source: DataSource,
    pub output: PathBuf,
    pub log_file: PathBuf,
    pub limit: CycleLimit,
    pub config: Config,
}

impl Cli {
    pub fn into_settings(self, mut config: Config) -> Result<RunSettings, Error> {
        let source = match self.source {
            SourceKind::Csv => DataSource::Csv(self.input.ok_or(Error::MissingInput)?),
            SourceKind::Sim => DataSource::Sim,
        };

        let category = self.limit_category.or(config.search.limit_category.take());
        let limit = match self.limit_length.as_deref() {
            Some(raw) => CycleLimit::parse(raw, category)?,
            None => CycleLimit::new(config.search.limit_length, category),
        };

        if self.max_cycles.is_some() {
            config.search.max_cycles = self.max_cycles;
        }
        if self.seed.is_some() {
            config.simulator.seed = self.seed;
        }

        let log_file = match &config.logging.log_file {
            Some(path) => path.clone(),
            None => {
                let mut name = self.output.clone().into_os_string();
                name.push(".log");
                PathBuf::from(name)
            }
        };

        Ok(RunSettings {
            source,
            output: self.output,
            log_file,
            limit,
            config,
        })
    }
}
