pub mod builder;
pub mod cli;
pub mod config;
pub mod csv_source;
pub mod error;
pub mod logging;
pub mod producer;
pub mod searcher;
pub mod simulator;
pub mod types;
pub mod writer;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use cli::{Cli, RunSettings};
use csv_source::CsvSource;
use error::Error;
use producer::Producer;
use searcher::CycleSearcher;
use simulator::SimulatorSource;
use types::{DataSource, JoinHandleResult};
use writer::{CycleWriter, OutputFormat};

use common::types::Cycle;
use cycle_core::{EnumerationStats, GraphCSR};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The subscriber may not be installed yet when configuration fails.
            eprintln!("cycle-finder: {}", e);
            error!(error = %e, "Pipeline failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = config::load_config(cli.config.as_deref())?;
    let settings = cli.into_settings(config)?;

    logging::init_tracing(&settings.config.logging.level, Some(&settings.log_file))?;

    info!(
        source = ?settings.source,
        output = %settings.output.display(),
        limit_length = ?settings.limit.max_len,
        limit_category = ?settings.limit.category,
        max_cycles = ?settings.config.search.max_cycles,
        "Starting cycle search"
    );
    let started = Instant::now();

    let graph = Arc::new(spawn_producer(&settings)?.await??);

    let (sender, receiver) = mpsc::channel::<Cycle>(settings.config.pipeline.channel_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // Ctrl-C stops the writer, which in turn stops the search.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received.");
            let _ = shutdown_tx.send(());
        }
    });

    let searcher_handle = spawn_searcher(graph.clone(), &settings, sender);
    let writer_handle = spawn_writer(graph, &settings, receiver, shutdown_rx);

    let (searched, written) = tokio::join!(searcher_handle, writer_handle);
    let written = written??;
    let stats = searched??;

    info!(
        roots = stats.roots_processed,
        found = stats.cycles_found,
        "Search finished"
    );
    info!("TOTAL = {} cycles", written);
    info!("Elapsed time: {}", format_elapsed(started.elapsed()));

    Ok(())
}

fn spawn_producer(settings: &RunSettings) -> Result<JoinHandleResult<GraphCSR>, Error> {
    let handle = match &settings.source {
        DataSource::Sim => {
            info!("Starting SimulatorSource producer task...");
            let source = SimulatorSource::new(settings.config.simulator.clone());
            Producer::new(source).spawn()
        }
        DataSource::Csv(path) => {
            info!("Starting CsvSource producer task...");
            let delimiter = settings.config.input.delimiter_byte()?;
            let source = CsvSource::new(path.clone(), delimiter);
            Producer::new(source).spawn()
        }
    };
    Ok(handle)
}

fn spawn_searcher(
    graph: types::SharedGraph,
    settings: &RunSettings,
    sender: mpsc::Sender<Cycle>,
) -> JoinHandleResult<EnumerationStats> {
    CycleSearcher::new(graph, settings.limit.clone()).spawn_task(sender)
}

fn spawn_writer(
    graph: types::SharedGraph,
    settings: &RunSettings,
    receiver: mpsc::Receiver<Cycle>,
    shutdown: watch::Receiver<()>,
) -> JoinHandleResult<usize> {
    let format = OutputFormat {
        delimiter: settings.config.output.delimiter.clone(),
        with_relationships: settings.config.output.with_relationships,
    };
    CycleWriter::new(
        graph,
        receiver,
        shutdown,
        settings.output.clone(),
        format,
        settings.config.search.max_cycles,
    )
    .spawn_task()
}

/// Formats a duration as `HH:MM:SS.mmm`.
fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1000) % 60;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis % 1000)
}
