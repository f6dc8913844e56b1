/*!
 * Heap Property Tests
 * Randomized operation sequences checked against the heap invariants
 */

use proptest::prelude::*;
use segheap::limits::{ALIGNMENT, BLOCK_OVERHEAD};
use segheap::{Address, Heap, HeapError, NULL_ADDRESS};
use std::collections::BTreeMap;

const CAPACITY: usize = 16 * 1024;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Release(usize),
    Resize(usize, usize),
    ZeroAllocate(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..2048).prop_map(Op::Allocate),
        3 => any::<usize>().prop_map(Op::Release),
        2 => (any::<usize>(), 0usize..3000).prop_map(|(i, n)| Op::Resize(i, n)),
        1 => (0usize..64, 0usize..64).prop_map(|(c, e)| Op::ZeroAllocate(c, e)),
    ]
}

/// Live allocations: address -> (requested length, fill byte)
type Live = BTreeMap<Address, (usize, u8)>;

fn pick(live: &Live, index: usize) -> Option<Address> {
    if live.is_empty() {
        return None;
    }
    live.keys().nth(index % live.len()).copied()
}

fn check_invariants(heap: &Heap, live: &Live) -> Result<(), TestCaseError> {
    prop_assert!(heap.check_integrity().is_ok(), "{:?}", heap.check_integrity());

    let blocks = heap.blocks();
    for pair in blocks.windows(2) {
        prop_assert!(!(pair[0].free && pair[1].free), "adjacent free blocks");
    }

    let mut previous_end = 0;
    for (&addr, &(len, fill)) in live {
        prop_assert_eq!(addr % ALIGNMENT, 0);
        let size = heap.block_size(addr).expect("live allocation");
        prop_assert!(size >= len);
        prop_assert!(addr >= previous_end, "overlapping payloads");
        previous_end = addr + size;
        prop_assert!(heap.read_bytes(addr, len).unwrap().iter().all(|&b| b == fill));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_operation_sequences_keep_invariants(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let mut heap = Heap::with_capacity(CAPACITY).unwrap();
        heap.initialize();
        let mut live = Live::new();
        let mut next_fill: u8 = 1;

        for op in ops {
            match op {
                Op::Allocate(size) => match heap.allocate(size) {
                    Ok(addr) => {
                        heap.write_bytes(addr, &vec![next_fill; size]).unwrap();
                        live.insert(addr, (size, next_fill));
                        next_fill = next_fill.wrapping_add(1).max(1);
                    }
                    Err(HeapError::OutOfMemory { .. }) => {}
                    Err(e) => return Err(TestCaseError::fail(e.to_string())),
                },
                Op::Release(index) => {
                    if let Some(addr) = pick(&live, index) {
                        heap.release(addr).unwrap();
                        live.remove(&addr);
                        prop_assert_eq!(heap.release(addr).unwrap_err(), HeapError::DoubleFree(addr));
                    }
                }
                Op::Resize(index, new_size) => {
                    if let Some(addr) = pick(&live, index) {
                        let (len, fill) = live[&addr];
                        match heap.resize(addr, new_size) {
                            Ok(moved) => {
                                live.remove(&addr);
                                live.insert(moved, (len.min(new_size), fill));
                            }
                            Err(HeapError::OutOfMemory { .. }) => {
                                prop_assert!(heap.is_valid(addr));
                            }
                            Err(e) => return Err(TestCaseError::fail(e.to_string())),
                        }
                    }
                }
                Op::ZeroAllocate(count, elem) => {
                    if let Ok(addr) = heap.zero_allocate(count, elem) {
                        live.insert(addr, (count * elem, 0));
                    }
                }
            }
            check_invariants(&heap, &live)?;
        }

        for addr in live.keys().copied().collect::<Vec<_>>() {
            heap.release(addr).unwrap();
        }
        let blocks = heap.blocks();
        prop_assert_eq!(blocks.len(), 1);
        prop_assert_eq!(blocks[0].size, CAPACITY - BLOCK_OVERHEAD);
    }

    #[test]
    fn prop_rejected_requests_leave_heap_whole(count in 2usize..1024, extra in 0usize..4096) {
        let mut heap = Heap::with_capacity(CAPACITY).unwrap();
        heap.initialize();

        prop_assert!(matches!(
            heap.zero_allocate(usize::MAX, count),
            Err(HeapError::SizeOverflow { .. })
        ), "expected SizeOverflow");
        prop_assert!(matches!(
            heap.allocate(CAPACITY + extra),
            Err(HeapError::OutOfMemory { .. })
        ), "expected OutOfMemory");
        heap.release(NULL_ADDRESS).unwrap();

        let blocks = heap.blocks();
        prop_assert_eq!(blocks.len(), 1);
        prop_assert!(blocks[0].free);
        prop_assert_eq!(blocks[0].size, CAPACITY - BLOCK_OVERHEAD);
    }

    #[test]
    fn prop_allocate_release_round_trip(size in 0usize..(CAPACITY - BLOCK_OVERHEAD)) {
        let mut heap = Heap::with_capacity(CAPACITY).unwrap();
        let addr = heap.allocate(size).unwrap();
        heap.release(addr).unwrap();

        let blocks = heap.blocks();
        prop_assert_eq!(blocks.len(), 1);
        prop_assert!(blocks[0].free);
        prop_assert_eq!(blocks[0].size, CAPACITY - BLOCK_OVERHEAD);
    }

    #[test]
    fn prop_allocations_are_aligned(sizes in prop::collection::vec(1usize..512, 1..40)) {
        let mut heap = Heap::with_capacity(CAPACITY).unwrap();
        for size in sizes {
            if let Ok(addr) = heap.allocate(size) {
                prop_assert_eq!(addr % ALIGNMENT, 0);
                prop_assert!(heap.block_size(addr).unwrap() >= size);
            }
        }
    }
}
