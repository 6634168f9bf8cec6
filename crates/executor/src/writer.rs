use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::select;
use tokio::sync::{mpsc::Receiver, watch};
use tracing::{debug, info};

use super::error::Error;
use super::types::SharedGraph;
use common::types::Cycle;
use cycle_core::GraphCSR;

/// How cycles are rendered into the output file.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    pub delimiter: String,
    pub with_relationships: bool,
}

/// Async consumer that appends every received cycle to the output file, one per line.
pub struct CycleWriter {
    graph: SharedGraph,
    receiver: Receiver<Cycle>,
    shutdown: watch::Receiver<()>, // signal for graceful shutdown
    output: PathBuf,
    format: OutputFormat,
    max_cycles: Option<usize>,
}

impl CycleWriter {
    pub fn new(
        graph: SharedGraph,
        receiver: Receiver<Cycle>,
        shutdown: watch::Receiver<()>,
        output: PathBuf,
        format: OutputFormat,
        max_cycles: Option<usize>,
    ) -> Self {
        Self {
            graph,
            receiver,
            shutdown,
            output,
            format,
            max_cycles,
        }
    }

    /// Run the writer asynchronously and return the number of cycles written.
    ///
    /// Exits when the searcher closes the channel, when `max_cycles` is reached or
    /// when the shutdown signal fires. Returning drops the receiver, which the
    /// searcher sees as a failed send and stops.
    pub async fn write_cycles(mut self) -> Result<usize, Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .await?;
        let mut out = BufWriter::new(file);
        let mut written = 0usize;

        info!(output = %self.output.display(), "Writer ready.");

        if self.max_cycles == Some(0) {
            return Ok(0);
        }

        loop {
            select! {
                cycle = self.receiver.recv() => {
                    match cycle {
                        Some(cycle) => {
                            let line = format_cycle(&self.graph, &cycle, &self.format)?;
                            out.write_all(line.as_bytes()).await?;
                            out.write_all(b"\n").await?;
                            written += 1;
                            debug!(len = cycle.len(), "Cycle written");

                            if self.max_cycles.is_some_and(|max| written >= max) {
                                info!(written, "Cycle cap reached, stopping writer.");
                                break;
                            }
                        }
                        None => {
                            info!("Receiver closed, shutting down writer.");
                            break;
                        }
                    }
                }

                Ok(()) = self.shutdown.changed() => {
                    info!("Shutdown signal received, stopping writer.");
                    break;
                }
            }
        }

        out.flush().await?;
        Ok(written)
    }

    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<usize, Error>> {
        tokio::spawn(self.write_cycles())
    }
}

/// Renders a cycle as vertex names in path order.
///
/// With relationships the labels of the traversed edges are included, closing
/// back on the starting vertex: `A -(socio)-> B -(administrador|socio)-> A`.
pub fn format_cycle(graph: &GraphCSR, cycle: &Cycle, format: &OutputFormat) -> Result<String, Error> {
    if !format.with_relationships {
        let names = cycle
            .path
            .iter()
            .map(|&v| graph.name(v))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(names.join(&format.delimiter));
    }

    let mut line = String::new();
    if let Some(&first) = cycle.path.first() {
        line.push_str(graph.name(first)?);
    }
    for (source, target) in cycle.edges() {
        let mut kinds = graph.edge_kinds_between(source, target)?;
        kinds.retain(|k| !k.is_empty());
        kinds.sort_unstable();
        kinds.dedup();

        if kinds.is_empty() {
            line.push_str(" -> ");
        } else {
            line.push_str(&format!(" -({})-> ", kinds.join("|")));
        }
        line.push_str(graph.name(target)?);
    }

    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::{Edge, Vertex};
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tokio::sync::mpsc;

    fn labelled_graph() -> SharedGraph {
        let vertices = vec![
            Vertex::from_name("PJ-1"),
            Vertex::from_name("PF-1"),
            Vertex::from_name("PJ-2"),
        ];
        let mut edges = vec![
            Edge::new(0, 1, "socio"),
            Edge::new(1, 2, "administrador"),
            Edge::new(1, 2, "socio"),
            Edge::new(2, 0, ""),
        ];
        Arc::new(GraphCSR::new(vertices, &mut edges).unwrap())
    }

    fn plain() -> OutputFormat {
        OutputFormat {
            delimiter: ";".to_string(),
            with_relationships: false,
        }
    }

    #[test]
    fn formats_names_in_path_order() {
        let graph = labelled_graph();
        let line = format_cycle(&graph, &Cycle::new(vec![1, 2, 0]), &plain()).unwrap();
        assert_eq!(line, "PF-1;PJ-2;PJ-1");
    }

    #[test]
    fn formats_relationship_labels() {
        let graph = labelled_graph();
        let format = OutputFormat {
            delimiter: ";".to_string(),
            with_relationships: true,
        };
        let line = format_cycle(&graph, &Cycle::new(vec![0, 1, 2]), &format).unwrap();
        assert_eq!(line, "PJ-1 -(socio)-> PF-1 -(administrador|socio)-> PJ-2 -> PJ-1");
    }

    #[test]
    fn unknown_vertex_is_an_error() {
        let graph = labelled_graph();
        assert!(format_cycle(&graph, &Cycle::new(vec![0, 9]), &plain()).is_err());
    }

    #[tokio::test]
    async fn appends_cycles_until_channel_closes() {
        let output = NamedTempFile::new().unwrap();
        std::fs::write(output.path(), "existing\n").unwrap();

        let (tx, rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(());
        let writer = CycleWriter::new(
            labelled_graph(),
            rx,
            shutdown_rx,
            output.path().to_path_buf(),
            plain(),
            None,
        );
        let handle = writer.spawn_task();

        tx.send(Cycle::new(vec![0, 1, 2])).await.unwrap();
        tx.send(Cycle::new(vec![1, 2, 0])).await.unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap().unwrap(), 2);
        let content = std::fs::read_to_string(output.path()).unwrap();
        assert_eq!(content, "existing\nPJ-1;PF-1;PJ-2\nPF-1;PJ-2;PJ-1\n");
    }

    #[tokio::test]
    async fn stops_at_cycle_cap() {
        let output = NamedTempFile::new().unwrap();

        let (tx, rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(());
        let writer = CycleWriter::new(
            labelled_graph(),
            rx,
            shutdown_rx,
            output.path().to_path_buf(),
            plain(),
            Some(1),
        );

        tx.send(Cycle::new(vec![0, 1, 2])).await.unwrap();
        tx.send(Cycle::new(vec![1, 2, 0])).await.unwrap();

        assert_eq!(writer.write_cycles().await.unwrap(), 1);
        // The writer dropped its receiver on return.
        assert!(tx.send(Cycle::new(vec![0, 1, 2])).await.is_err());

        let content = std::fs::read_to_string(output.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn shutdown_signal_stops_writer() {
        let output = NamedTempFile::new().unwrap();

        let (_tx, rx) = mpsc::channel::<Cycle>(4);
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let writer = CycleWriter::new(
            labelled_graph(),
            rx,
            shutdown_rx,
            output.path().to_path_buf(),
            plain(),
            None,
        );
        let handle = writer.spawn_task();

        shutdown_tx.send(()).unwrap();
        assert_eq!(handle.await.unwrap().unwrap(), 0);
    }
}
