/*!
 * Address Recycling Test
 * Verifies that released regions are reused and neighbours stay untouched
 */

use pretty_assertions::assert_eq;
use segheap::limits::{BLOCK_OVERHEAD, HEADER_SIZE};
use segheap::Heap;

#[test]
fn test_reuse_within_size_class() {
    let mut heap = Heap::new();
    heap.initialize();

    let x = heap.allocate(60).expect("Failed to allocate x");
    let y = heap.allocate(300).expect("Failed to allocate y");
    heap.write_bytes(y, &[0x5A; 300]).expect("Failed to fill y");

    heap.release(x).expect("Failed to release x");
    assert_eq!(heap.bins()[0], vec![64]);

    let z = heap.allocate(50).expect("Failed to allocate z");
    assert_eq!(z, x, "z should reuse x's freed region");
    assert_eq!(heap.block_size(z), Some(64));
    assert_eq!(heap.read_bytes(y, 300).unwrap(), vec![0x5A; 300]);
    assert!(heap.bins()[0].is_empty());
    heap.check_integrity().unwrap();
}

#[test]
fn test_freed_middle_block_is_recycled_and_split() {
    let mut heap = Heap::new();

    let a = heap.allocate(1024).unwrap();
    let b = heap.allocate(2048).unwrap();
    let c = heap.allocate(512).unwrap();
    assert!(b > a && c > b, "fresh allocations grow upward");

    heap.release(b).unwrap();

    // 2048 lives in the >1024 bin with the arena tail; the newest entry (b) is found first
    let d = heap.allocate(1024).unwrap();
    assert_eq!(d, b);

    // The remainder of b's block follows d directly
    let e = heap.allocate(512).unwrap();
    assert_eq!(e, d + 1024 + BLOCK_OVERHEAD);
    assert!(e < c);

    for addr in [a, c, d, e] {
        heap.release(addr).unwrap();
    }
    let blocks = heap.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].address, HEADER_SIZE);
}

#[test]
fn test_repeated_cycles_do_not_exhaust_arena() {
    let mut heap = Heap::with_capacity(64 * 1024).unwrap();

    for round in 0..100 {
        let addrs: Vec<_> = (0..10)
            .map(|i| {
                heap.allocate(1024)
                    .unwrap_or_else(|e| panic!("round {} allocation {}: {}", round, i, e))
            })
            .collect();
        for addr in addrs {
            heap.release(addr).unwrap();
        }
    }

    assert_eq!(heap.blocks().len(), 1);
    assert_eq!(heap.stats().allocation_count, 1000);
}
