use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::builder::GraphBuilder;
use super::config::SimulatorConfig;
use super::error::Error;
use super::types::GraphSource;
use cycle_core::GraphCSR;

/// Category used when the configuration lists none.
const FALLBACK_CATEGORY: &str = "V";

/// Produces a synthetic relationship graph for trying the pipeline without input data.
///
/// Vertices are named `<category>-<index>` with a random category from the
/// configured list; edges join random distinct vertices and carry a random
/// relationship label. A fixed `seed` makes the graph reproducible.
pub struct SimulatorSource {
    config: SimulatorConfig,
}

impl SimulatorSource {
    pub fn new(config: SimulatorConfig) -> Self {
        SimulatorSource { config }
    }

    fn generate(&self) -> Result<GraphCSR, Error> {
        let mut rng: SmallRng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let total = self.config.total_vertices;
        let names: Vec<String> = (0..total)
            .map(|i| {
                let category = if self.config.categories.is_empty() {
                    FALLBACK_CATEGORY
                } else {
                    let pick = rng.random_range(0..self.config.categories.len());
                    self.config.categories[pick].as_str()
                };
                format!("{}-{}", category, i)
            })
            .collect();

        let mut builder = GraphBuilder::new();
        for name in &names {
            builder.vertex(name);
        }

        // Self-loops need a second distinct vertex to avoid.
        if total >= 2 {
            for _ in 0..self.config.total_edges {
                let from = rng.random_range(0..total);
                let mut to = rng.random_range(0..total - 1);
                if to >= from {
                    to += 1;
                }
                let kind = if self.config.kinds.is_empty() {
                    ""
                } else {
                    let pick = rng.random_range(0..self.config.kinds.len());
                    self.config.kinds[pick].as_str()
                };

                builder.relationship(&names[from], &names[to], kind);
            }
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl GraphSource for SimulatorSource {
    async fn load(self) -> Result<GraphCSR, Error> {
        let graph = self.generate()?;

        info!(
            vertices = graph.total_vertices(),
            edges = graph.total_edges(),
            seed = ?self.config.seed,
            "SimulatorSource: graph generated"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycle_core::Digraph;

    fn config(seed: Option<u64>) -> SimulatorConfig {
        SimulatorConfig {
            total_vertices: 30,
            total_edges: 90,
            categories: vec!["PJ".to_string(), "PF".to_string()],
            kinds: vec!["socio".to_string()],
            seed,
        }
    }

    /// SimulatorSource builds a graph of the requested size.
    #[test]
    fn test_graph_size() {
        let graph = SimulatorSource::new(config(Some(7))).generate().unwrap();

        assert_eq!(graph.total_vertices(), 30);
        assert_eq!(graph.total_edges(), 90);
    }

    /// Every vertex carries one of the configured categories and no self-loop is generated.
    #[test]
    fn test_categories_and_no_self_loops() {
        let graph = SimulatorSource::new(config(Some(11))).generate().unwrap();

        for v in 0..graph.total_vertices() {
            let category = graph.category(v).unwrap();
            assert!(category == "PJ" || category == "PF", "unexpected {}", category);
            assert!(graph.edge_kinds_between(v, v).unwrap().is_empty());
        }
    }

    /// The same seed yields the same graph.
    #[test]
    fn test_seed_is_reproducible() {
        let a = SimulatorSource::new(config(Some(3))).generate().unwrap();
        let b = SimulatorSource::new(config(Some(3))).generate().unwrap();

        for v in 0..a.total_vertices() {
            assert_eq!(a.name(v).unwrap(), b.name(v).unwrap());
            assert_eq!(a.out_neighbors(v).unwrap(), b.out_neighbors(v).unwrap());
        }
    }

    /// A single vertex cannot have edges without self-loops.
    #[test]
    fn test_single_vertex_has_no_edges() {
        let mut cfg = config(Some(1));
        cfg.total_vertices = 1;
        cfg.categories.clear();

        let graph = SimulatorSource::new(cfg).generate().unwrap();
        assert_eq!(graph.total_edges(), 0);
        assert_eq!(graph.name(0).unwrap(), "V-0");
    }
}
