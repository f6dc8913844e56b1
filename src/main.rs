/*!
 * segheap - Demo Entry Point
 *
 * Runs the reuse scenario on a fresh arena and prints the free-list dump
 * plus heap statistics as JSON.
 */

use anyhow::Context;
use segheap::{init_tracing, span_heap_op, Heap};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut heap = Heap::new();
    heap.initialize();

    let span = span_heap_op("reuse_scenario");
    let x = heap.allocate(60).context("allocating x")?;
    let y = heap.allocate(300).context("allocating y")?;
    heap.write_bytes(y, &[0x5A; 300]).context("filling y")?;
    heap.release(x).context("releasing x")?;
    let z = heap.allocate(50).context("allocating z")?;
    span.record_result(z == x);
    drop(span);

    info!(x, y, z, reused = z == x, "Reuse scenario finished");

    print!("{}", heap.dump_state());
    heap.check_integrity().context("heap integrity")?;

    let stats = serde_json::to_string_pretty(&heap.stats()).context("serializing stats")?;
    println!("{}", stats);

    Ok(())
}
