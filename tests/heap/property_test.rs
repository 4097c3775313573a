/*!
 * Property Tests
 * Disjointness, conservation, and address ordering under random workloads
 */

use proptest::prelude::*;
use strata_heap::{HeapManager, Strategy as Placement};

#[derive(Debug, Clone)]
enum Op {
    Alloc(Placement, usize),
    Release(usize),
}

fn placement() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::FirstFit),
        Just(Placement::BestFit),
        Just(Placement::WorstFit),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (placement(), 1usize..512).prop_map(|(strategy, size)| Op::Alloc(strategy, size)),
        (0usize..64).prop_map(Op::Release),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Payload ranges of live allocations never overlap, and every granted
    /// byte stays accounted for along the chain as long as no sweep runs.
    #[test]
    fn heap_invariants_hold_under_random_workloads(
        ops in proptest::collection::vec(op(), 1..80)
    ) {
        let heap = HeapManager::with_capacity(16 * 1024 * 1024);
        let mut live: Vec<(usize, usize)> = Vec::new();

        for op in ops {
            match op {
                Op::Alloc(strategy, size) => {
                    let addr = heap.allocate(strategy, size).unwrap();
                    for &(start, len) in &live {
                        prop_assert!(
                            addr + size <= start || addr >= start + len,
                            "payload [{}, {}) overlaps live [{}, {})",
                            addr, addr + size, start, start + len
                        );
                    }
                    live.push((addr, size));
                }
                Op::Release(pick) => {
                    if !live.is_empty() {
                        let (addr, _) = live.swap_remove(pick % live.len());
                        heap.release(addr);
                    }
                }
            }

            let stats = heap.stats();
            prop_assert_eq!(stats.ledger_bytes, stats.granted);
            prop_assert!(
                stats.used_bytes >= live.iter().map(|&(_, len)| len).sum::<usize>()
            );
        }

        // The chain is laid out in address order with adjacent extents
        let snapshot = heap.dump_heap_state();
        for pair in snapshot.windows(2) {
            prop_assert_eq!(pair[0].payload + pair[0].size, pair[1].header);
            prop_assert_eq!(pair[0].next_header, Some(pair[1].header));
        }
    }

    /// Freeing an allocation always makes its bytes reusable by a same-size
    /// request under every strategy.
    #[test]
    fn release_then_reallocate_reuses_the_block(
        strategy in placement(),
        size in 64usize..2048,
    ) {
        let heap = HeapManager::with_capacity(16 * 1024 * 1024);
        let addr = heap.allocate(strategy, size).unwrap();
        heap.release(addr);
        let granted = heap.stats().granted;

        // Small enough that even best/worst-fit accept the freed block
        let request = size / 2;
        let reused = heap.allocate(strategy, request.max(1)).unwrap();
        prop_assert!(reused >= addr && reused < addr + size);
        prop_assert_eq!(heap.stats().granted, granted);
    }
}
