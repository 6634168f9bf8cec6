use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, error, info};

use super::builder::GraphBuilder;
use super::error::Error;
use super::types::GraphSource;
use cycle_core::GraphCSR;

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct CsvRecord {
    #[serde(rename = "source")]
    pub source_name: String,

    #[serde(rename = "target")]
    pub target_name: String,

    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Reads a delimited relationship file (`source;target;type`, header row required).
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: PathBuf, delimiter: u8) -> Self {
        CsvSource { path, delimiter }
    }

    fn parse_csv_to_graph(&self) -> Result<GraphCSR, Error> {
        let file = File::open(&self.path).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to read relationship file");
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(file);

        let mut builder = GraphBuilder::new();

        for result in rdr.deserialize() {
            let record: CsvRecord = result?;
            builder.relationship(&record.source_name, &record.target_name, &record.kind);
        }
        debug!(
            names = builder.vertex_count(),
            rows = builder.edge_count(),
            "Relationship file read"
        );

        Ok(builder.build()?)
    }
}

#[async_trait::async_trait]
impl GraphSource for CsvSource {
    async fn load(self) -> Result<GraphCSR, Error> {
        info!(path = %self.path.display(), "CsvSource: reading relationships");
        let graph = self.parse_csv_to_graph()?;

        info!(
            vertices = graph.total_vertices(),
            edges = graph.total_edges(),
            "Graph created"
        );
        Ok(graph)
    }
}
