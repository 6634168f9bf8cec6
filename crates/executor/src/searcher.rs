use tokio::sync::mpsc::Sender;
use tracing::{info, warn};

use super::{error::Error, types::SharedGraph};
use common::types::Cycle;
use cycle_core::{CycleLimit, EnumerationStats, enumerate_cycles};

/// Drives the cycle enumeration and streams each cycle to the writer.
///
/// The enumeration is CPU bound and synchronous, so it runs on Tokio's blocking pool.
/// Sending blocks while the channel is full, which keeps the search only as far
/// ahead of the writer as the channel capacity.
pub struct CycleSearcher {
    graph: SharedGraph,
    limit: CycleLimit,
}

impl CycleSearcher {
    pub fn new(graph: SharedGraph, limit: CycleLimit) -> Self {
        CycleSearcher { graph, limit }
    }

    /// Runs the whole enumeration, stopping early once the receiver is gone.
    pub fn search_for_cycles(self, sender: Sender<Cycle>) -> Result<EnumerationStats, Error> {
        info!(limit = ?self.limit, "Searcher ready.");

        let mut enumerator = enumerate_cycles(&self.graph, self.limit);

        for cycle in enumerator.by_ref() {
            let cycle = cycle?;
            if sender.blocking_send(cycle).is_err() {
                warn!("Searcher: writer stopped receiving, abandoning the search.");
                break;
            }
        }

        let stats = enumerator.stats();
        info!(
            cycles = stats.cycles_found,
            roots = stats.roots_processed,
            "Searcher: enumeration finished"
        );
        Ok(stats)
    }

    pub fn spawn_task(self, sender: Sender<Cycle>) -> tokio::task::JoinHandle<Result<EnumerationStats, Error>> {
        tokio::task::spawn_blocking(move || self.search_for_cycles(sender))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycle_core::GraphCSR;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn two_triangles() -> SharedGraph {
        Arc::new(
            GraphCSR::from_edges(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap(),
        )
    }

    #[tokio::test]
    async fn streams_every_cycle() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = CycleSearcher::new(two_triangles(), CycleLimit::unbounded()).spawn_task(tx);

        let mut received = Vec::new();
        while let Some(cycle) = rx.recv().await {
            received.push(cycle.canonical().path);
        }
        received.sort();

        let stats = handle.await.unwrap().unwrap();
        assert_eq!(received, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(stats.cycles_found, 2);
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let edges: Vec<(usize, usize)> = (0..8)
            .flat_map(|u| (0..8).filter(move |&v| v != u).map(move |v| (u, v)))
            .collect();
        let graph = Arc::new(GraphCSR::from_edges(8, &edges).unwrap());

        let (tx, mut rx) = mpsc::channel(1);
        let handle = CycleSearcher::new(graph, CycleLimit::unbounded()).spawn_task(tx);

        assert!(rx.recv().await.is_some());
        drop(rx);

        let stats = handle.await.unwrap().unwrap();
        // The complete digraph on 8 vertices has far more cycles than were consumed.
        assert!(stats.cycles_found < 1000);
    }
}
