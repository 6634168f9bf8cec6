use tracing::info;

use super::types::{GraphSource, JoinHandleResult};
use cycle_core::GraphCSR;

/// Runs a [`GraphSource`] on the runtime and hands back the loaded graph.
pub struct Producer<S: GraphSource> {
    source: S,
}

impl<S> Producer<S>
where
    S: GraphSource,
{
    pub fn new(source: S) -> Self {
        Producer { source }
    }

    pub fn spawn(self) -> JoinHandleResult<GraphCSR> {
        info!("Producer ready.");
        tokio::spawn(async move { self.source.load().await })
    }
}
