//! Elementary cycle enumeration for directed relationship graphs.
//!
//! [`enumerate_cycles`] is the entry point: it yields every elementary cycle of a
//! [`GraphCSR`] lazily, optionally bounded by a [`CycleLimit`].

pub mod csr;
pub mod enumerator;
pub mod limit;
pub mod scc;
pub mod search;
pub mod traits;

pub use csr::{GraphCSR, InducedSubgraph};
pub use enumerator::{CycleEnumerator, EnumerationStats, enumerate_cycles};
pub use limit::CycleLimit;
pub use traits::Digraph;
