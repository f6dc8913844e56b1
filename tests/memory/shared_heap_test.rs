/*!
 * Shared Heap Tests
 * One heap driven from several threads through the coarse lock
 */

use segheap::{Allocator, Heap, HeapInfo, MemoryPressure, SharedHeap};
use std::thread;

#[test]
fn test_concurrent_allocate_release() {
    let heap = SharedHeap::new(Heap::with_capacity(512 * 1024).unwrap());
    heap.initialize();

    let handles: Vec<_> = (0..8u8)
        .map(|tag| {
            let heap = heap.clone();
            thread::spawn(move || {
                for round in 0..200 {
                    let size = 16 + (round % 32) * 8;
                    let addr = heap.allocate(size).expect("allocation failed");
                    heap.write_bytes(addr, &vec![tag; size]).unwrap();
                    assert_eq!(heap.read_bytes(addr, size).unwrap(), vec![tag; size]);
                    heap.deallocate(addr).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    heap.check_integrity().unwrap();
    let stats = heap.stats();
    assert_eq!(stats.allocation_count, 1600);
    assert_eq!(stats.release_count, 1600);
    assert_eq!(stats.used_blocks, 0);
    assert_eq!(stats.free_blocks, 1);
}

#[test]
fn test_trait_object_usage() {
    let shared = SharedHeap::new(Heap::with_capacity(8192).unwrap());
    let allocator: &dyn Allocator = &shared;

    let addr = allocator.zero_allocate(4, 8).unwrap();
    assert_eq!(allocator.block_size(addr), Some(32));

    let moved = allocator.reallocate(addr, 256).unwrap();
    assert!(allocator.is_valid(moved));
    allocator.deallocate(moved).unwrap();

    assert!(shared.dump_state().contains("Bin[5]:"));
    assert_eq!(shared.pressure(), MemoryPressure::Low);
}
