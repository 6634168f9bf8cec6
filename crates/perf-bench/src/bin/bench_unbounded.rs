use std::hint::black_box;
use std::time::Instant;

use cycle_core::{CycleLimit, enumerate_cycles};
use perf_bench::*;

fn main() -> Result<(), common::error::Error> {
    let graph = complete_digraph(COMPLETE_VERTICES)?;

    let start_time = Instant::now();
    let mut cycles = 0u64;
    let mut total_len = 0usize;

    for cycle in enumerate_cycles(&graph, CycleLimit::unbounded()) {
        let cycle = black_box(cycle?);
        cycles += 1;
        total_len += cycle.len();
    }

    let elapsed_time = start_time.elapsed();

    println!(
        "--- Unbounded Benchmark Results (complete digraph, {} vertices) ---",
        COMPLETE_VERTICES
    );
    println!(
        "Cycles: {} (expected {})",
        cycles,
        complete_digraph_cycles(COMPLETE_VERTICES)
    );
    println!("Total cycle length: {}", black_box(total_len));
    println!("Elapsed Time: {:?}", elapsed_time);
    Ok(())
}
