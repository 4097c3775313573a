/*!
 * Collection Driver Tests
 * Timer configuration, enable/disable gating, and shutdown
 */

use serial_test::serial;
use std::thread;
use std::time::Duration;
use strata_heap::{CollectionDriver, HeapError, HeapManager, Strategy};

#[test]
fn test_zero_interval_is_a_configuration_error() {
    let heap = HeapManager::with_capacity(4096);
    let result = CollectionDriver::configure(heap, Duration::ZERO);
    assert!(matches!(
        result.map(|_| ()),
        Err(HeapError::InvalidInterval { .. })
    ));
}

#[test]
#[serial]
fn test_timer_driven_cycle_sweeps_unreachable_blocks() {
    let heap = HeapManager::with_capacity(4096);
    let a = heap.allocate(Strategy::FirstFit, 64).unwrap();
    let b = heap.allocate(Strategy::FirstFit, 64).unwrap();
    heap.release(a);

    let driver =
        CollectionDriver::configure(heap.clone(), Duration::from_millis(50)).unwrap();
    heap.enable_collection();

    thread::sleep(Duration::from_millis(400));

    let stats = heap.stats();
    assert!(stats.collections_run >= 1, "no timer-driven cycle ran");
    assert_eq!(stats.block_count, 1);
    assert!(heap.is_valid(b));

    driver.shutdown();

    // A stopped driver ticks no more
    let runs = heap.stats().collections_run;
    thread::sleep(Duration::from_millis(200));
    assert_eq!(heap.stats().collections_run, runs);
}

#[test]
#[serial]
fn test_collection_starts_disabled() {
    let heap = HeapManager::with_capacity(4096);
    let a = heap.allocate(Strategy::FirstFit, 64).unwrap();
    heap.release(a);

    let _driver =
        CollectionDriver::configure(heap.clone(), Duration::from_millis(50)).unwrap();
    thread::sleep(Duration::from_millis(250));

    // Ticks fire but the flag was never set
    assert_eq!(heap.stats().collections_run, 0);
    assert_eq!(heap.stats().block_count, 1);
}

#[test]
#[serial]
fn test_disable_stops_future_cycles() {
    let heap = HeapManager::with_capacity(4096);
    let driver =
        CollectionDriver::configure(heap.clone(), Duration::from_millis(50)).unwrap();

    heap.enable_collection();
    thread::sleep(Duration::from_millis(250));
    assert!(heap.stats().collections_run >= 1);

    heap.disable_collection();
    // Let a tick already past the gate finish before sampling
    thread::sleep(Duration::from_millis(120));
    let runs = heap.stats().collections_run;

    thread::sleep(Duration::from_millis(300));
    assert_eq!(heap.stats().collections_run, runs);

    driver.shutdown();
}
