/*!
 * Strata Heap - Demonstration Entry Point
 *
 * Thin CLI collaborator around the library: configures the collection
 * interval, exercises the three placement strategies, and streams heap
 * events to stdout.
 *
 * Usage: strata-heap [strategy] [interval-seconds]
 * Environment: STRATA_STRATEGY, STRATA_GC_INTERVAL
 */

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use strata_heap::core::limits::DEFAULT_COLLECTION_INTERVAL_SECS;
use strata_heap::{CollectionDriver, EventCollector, HeapManager, Strategy};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let strategy = args
        .next()
        .or_else(|| std::env::var("STRATA_STRATEGY").ok())
        .map(|s| Strategy::parse(&s))
        .unwrap_or_default();
    let interval_secs: u64 = args
        .next()
        .or_else(|| std::env::var("STRATA_GC_INTERVAL").ok())
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(DEFAULT_COLLECTION_INTERVAL_SECS);

    info!("strata-heap starting with {} placement", strategy);

    let collector = Arc::new(EventCollector::new());
    let events = collector.subscribe();
    let heap = HeapManager::new().with_collector(Arc::clone(&collector));

    let driver = CollectionDriver::configure(heap.clone(), Duration::from_secs(interval_secs))?;
    heap.enable_collection();

    // A few allocations, one of them rooted
    let a = heap.allocate(strategy, 256)?;
    let b = heap.allocate(strategy, 1024)?;
    let c = heap.allocate_zeroed(strategy, 16, 64)?;
    heap.register_root(b);

    info!("heap after allocation:");
    heap.dump_heap_state();

    // Free two blocks; the rooted one stays
    heap.release(a);
    heap.release(c);

    info!("waiting for a timer-driven collection cycle...");
    std::thread::sleep(Duration::from_secs(interval_secs * 2));

    info!("heap after collection:");
    heap.dump_heap_state();

    let stats = heap.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    heap.disable_collection();
    driver.shutdown();

    while let Ok(event) = events.try_recv() {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
