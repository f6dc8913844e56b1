/*!
 * Heap Stress Test
 * Many random allocations and releases against a full-size arena
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use segheap::limits::ARENA_CAPACITY;
use segheap::{Heap, HeapError};

const ITERATIONS: usize = 10_000;
const MAX_ALLOCATION_SIZE: usize = 4096;

#[test]
fn test_random_allocate_then_release_all() {
    let mut heap = Heap::new();
    let mut rng = StdRng::seed_from_u64(0x5EED);

    let mut allocations = Vec::with_capacity(ITERATIONS);
    let mut failures = 0;
    for _ in 0..ITERATIONS {
        let size = rng.gen_range(1..=MAX_ALLOCATION_SIZE);
        match heap.allocate(size) {
            Ok(addr) => allocations.push(addr),
            Err(HeapError::OutOfMemory { .. }) => failures += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    // 10k requests averaging 2KB cannot all fit in 1MB
    assert!(failures > 0);
    heap.check_integrity().unwrap();

    for addr in allocations {
        heap.release(addr).unwrap();
    }

    let stats = heap.stats();
    assert_eq!(stats.used_blocks, 0);
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.largest_free, ARENA_CAPACITY - segheap::limits::BLOCK_OVERHEAD);
}

#[test]
fn test_interleaved_churn() {
    let mut heap = Heap::with_capacity(256 * 1024).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let mut live = Vec::new();

    for round in 0..ITERATIONS {
        if live.is_empty() || rng.gen_bool(0.6) {
            if let Ok(addr) = heap.allocate(rng.gen_range(0..2048)) {
                live.push(addr);
            }
        } else {
            let index = rng.gen_range(0..live.len());
            heap.release(live.swap_remove(index)).unwrap();
        }

        if round % 500 == 0 {
            heap.check_integrity().unwrap();
        }
    }

    for addr in live {
        heap.release(addr).unwrap();
    }
    assert_eq!(heap.blocks().len(), 1);
}
