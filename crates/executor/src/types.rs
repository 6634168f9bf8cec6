use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::error::Error;
use cycle_core::GraphCSR;

/// A trait defining the contract for any source that produces the relationship graph
/// the pipeline searches.
///
/// This trait decouples the Producer task from the concrete origin of the data
/// (e.g., CSV file vs. simulated data).
///
/// The trait bounds (`Send`, `Sync`, `'static`) let the implementation run on the
/// multi-threaded asynchronous runtime (Tokio).
#[async_trait::async_trait]
pub trait GraphSource: Send + Sync + 'static {
    async fn load(self) -> Result<GraphCSR, Error>;
}

/// Where the relationship graph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Delimited relationship file.
    Csv(PathBuf),
    /// Randomly generated graph.
    Sim,
}

/// The loaded graph, shared read-only between the searcher and the writer.
pub type SharedGraph = Arc<GraphCSR>;

pub type JoinHandleResult<T> = JoinHandle<Result<T, Error>>;
