use std::hint::black_box;
use std::time::Instant;

use cycle_core::{CycleLimit, enumerate_cycles};
use perf_bench::*;

fn main() -> Result<(), common::error::Error> {
    let graph = ring_of_cliques(RING_CLIQUES, CLIQUE_SIZE)?;
    let limit = CycleLimit::new(RING_LIMIT, None);

    let start_time = Instant::now();
    let mut cycles = 0u64;
    let mut longest = 0usize;

    let mut enumerator = enumerate_cycles(&graph, limit);
    for cycle in enumerator.by_ref() {
        let cycle = black_box(cycle?);
        cycles += 1;
        longest = longest.max(cycle.len());
    }

    let elapsed_time = start_time.elapsed();
    let stats = enumerator.stats();

    println!(
        "--- Limited Benchmark Results ({} cliques of {}, limit {}) ---",
        RING_CLIQUES, CLIQUE_SIZE, RING_LIMIT
    );
    println!("Cycles: {}", cycles);
    println!("Longest cycle: {}", longest);
    println!("Roots processed: {}", stats.roots_processed);
    println!("Elapsed Time: {:?}", elapsed_time);
    Ok(())
}
