/*!
 * Heap Manager Tests
 * Allocation, release, reuse, and exhaustion handling
 */

use pretty_assertions::assert_eq;
use strata_heap::core::limits::HEADER_BYTES;
use strata_heap::{HeapError, HeapManager, Strategy};

#[test]
fn test_heap_initialization() {
    let heap = HeapManager::with_capacity(4096);
    let stats = heap.stats();

    assert_eq!(stats.capacity, 4096);
    assert_eq!(stats.granted, 0);
    assert_eq!(stats.block_count, 0);
    assert_eq!(stats.root_count, 0);
}

#[test]
fn test_basic_allocation() {
    let heap = HeapManager::with_capacity(4096);

    let addr = heap.allocate(Strategy::FirstFit, 256).unwrap();
    assert_eq!(addr, HEADER_BYTES);

    let stats = heap.stats();
    assert_eq!(stats.used_bytes, 256);
    assert_eq!(stats.granted, 256 + HEADER_BYTES);
    assert!(heap.is_valid(addr));
    assert_eq!(heap.block_size(addr), Some(256));
}

#[test]
fn test_allocations_are_disjoint() {
    let heap = HeapManager::with_capacity(1024 * 1024);

    let mut ranges = Vec::new();
    for size in [64, 256, 1024, 32] {
        let addr = heap.allocate(Strategy::FirstFit, size).unwrap();
        ranges.push((addr, addr + size));
    }

    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "payload ranges overlap: {:?}", pair);
    }
}

#[test]
fn test_zeroed_allocation() {
    let heap = HeapManager::with_capacity(4096);

    // Dirty a block, free it, then ask for zeroed memory that reuses it
    let addr = heap.allocate(Strategy::FirstFit, 128).unwrap();
    heap.write_payload(addr, &[0xFF; 128]).unwrap();
    heap.release(addr);

    let zeroed = heap.allocate_zeroed(Strategy::FirstFit, 16, 8).unwrap();
    assert_eq!(zeroed, addr);
    assert_eq!(heap.block_size(zeroed), Some(128));
    assert_eq!(heap.read_payload(zeroed, 128).unwrap(), vec![0u8; 128]);
}

#[test]
fn test_payload_access_is_bounds_checked() {
    let heap = HeapManager::with_capacity(4096);
    let addr = heap.allocate(Strategy::FirstFit, 16).unwrap();

    heap.write_payload(addr, b"hello").unwrap();
    assert_eq!(heap.read_payload(addr, 5).unwrap(), b"hello");

    assert_eq!(
        heap.write_payload(addr, &[0u8; 17]),
        Err(HeapError::InvalidSize { requested: 17 })
    );
    assert_eq!(
        heap.read_payload(0xBAD, 1),
        Err(HeapError::InvalidAddress(0xBAD))
    );

    // Freed payloads are no longer addressable
    heap.release(addr);
    assert_eq!(
        heap.read_payload(addr, 1),
        Err(HeapError::InvalidAddress(addr))
    );
}

#[test]
fn test_zeroed_allocation_overflow_is_checked() {
    let heap = HeapManager::with_capacity(4096);

    let result = heap.allocate_zeroed(Strategy::FirstFit, usize::MAX, 2);
    assert_eq!(
        result,
        Err(HeapError::SizeOverflow {
            count: usize::MAX,
            elem_size: 2,
        })
    );
    // Nothing was placed or grown
    assert_eq!(heap.stats().granted, 0);
}

#[test]
fn test_zero_sized_allocation_is_rejected() {
    let heap = HeapManager::with_capacity(4096);
    assert_eq!(
        heap.allocate(Strategy::BestFit, 0),
        Err(HeapError::InvalidSize { requested: 0 })
    );
    assert_eq!(
        heap.allocate_zeroed(Strategy::BestFit, 0, 64),
        Err(HeapError::InvalidSize { requested: 0 })
    );
}

#[test]
fn test_region_exhaustion_fails_fast() {
    let heap = HeapManager::with_capacity(256);

    heap.allocate(Strategy::FirstFit, 128).unwrap();
    let result = heap.allocate(Strategy::FirstFit, 128);

    match result {
        Err(HeapError::RegionExhausted {
            requested,
            granted,
            capacity,
        }) => {
            assert_eq!(requested, 128 + HEADER_BYTES);
            assert_eq!(granted, 128 + HEADER_BYTES);
            assert_eq!(capacity, 256);
        }
        other => panic!("expected RegionExhausted, got {:?}", other),
    }

    // The failed request left the ledger untouched
    assert_eq!(heap.stats().block_count, 1);
}

#[test]
fn test_release_of_unknown_address_is_a_no_op() {
    let heap = HeapManager::with_capacity(4096);
    let addr = heap.allocate(Strategy::FirstFit, 64).unwrap();

    heap.release(0xBAD);
    // An interior address is not a payload start either
    heap.release(addr + 1);

    assert!(heap.is_valid(addr));
    assert_eq!(heap.stats().block_count, 1);
}

#[test]
fn test_double_release_is_tolerated() {
    let heap = HeapManager::with_capacity(4096);
    let addr = heap.allocate(Strategy::FirstFit, 64).unwrap();

    heap.release(addr);
    let stats_after_first = heap.stats();
    heap.release(addr);

    // Already free: nothing changes
    assert_eq!(heap.stats().free_bytes, stats_after_first.free_bytes);
    assert_eq!(heap.stats().block_count, stats_after_first.block_count);
}

#[test]
fn test_round_trip_reuse_for_all_strategies() {
    for strategy in [Strategy::FirstFit, Strategy::BestFit, Strategy::WorstFit] {
        let heap = HeapManager::with_capacity(4096);

        let addr = heap.allocate(strategy, 100).unwrap();
        heap.release(addr);
        let granted_before = heap.stats().granted;

        let reused = heap.allocate(strategy, 60).unwrap();
        assert!(
            reused >= addr && reused < addr + 100,
            "{} did not reuse the freed block",
            strategy
        );
        // Reuse, not fresh growth
        assert_eq!(heap.stats().granted, granted_before);
    }
}

#[test]
fn test_conservation_at_quiescence() {
    let heap = HeapManager::with_capacity(1024 * 1024);

    let mut addrs = Vec::new();
    for size in [64, 200, 32, 512, 96] {
        addrs.push(heap.allocate(Strategy::BestFit, size).unwrap());
    }
    heap.release(addrs[1]);
    heap.release(addrs[3]);
    heap.allocate(Strategy::WorstFit, 48).unwrap();

    // Every granted byte is accounted for along the chain (no sweeps ran)
    let stats = heap.stats();
    assert_eq!(stats.ledger_bytes, stats.granted);
}
