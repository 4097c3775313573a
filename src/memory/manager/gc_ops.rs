/*!
 * Heap Manager Collection Operations
 * Synchronous cycles and the enable flag consulted by the timer driver
 */

use super::{HeapManager, HeapState};
use crate::memory::gc::{collector::run_cycle, GcOutcome};
use crate::monitoring::{Category, Event, Payload, Severity};
use log::info;
use std::sync::atomic::Ordering;

impl HeapManager {
    /// Run one synchronous mark-sweep cycle.
    ///
    /// The cycle holds the state lock end to end, so it always observes the
    /// ledger at a safe point.
    pub fn collect_now(&self) -> GcOutcome {
        let mut state = self.state.lock();
        let HeapState { ledger, roots, .. } = &mut *state;
        let outcome = run_cycle(ledger, roots);
        drop(state);

        let cycle = self.collections_run.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "collection cycle #{}: {} marked, {} swept ({} bytes) in {}ms",
            cycle,
            outcome.marked_blocks,
            outcome.swept_blocks,
            outcome.swept_bytes,
            outcome.duration_ms,
        );

        if let Some(ref collector) = self.collector() {
            collector.emit(Event::new(
                Severity::Info,
                Category::Gc,
                Payload::GcCompleted {
                    marked_blocks: outcome.marked_blocks,
                    swept_blocks: outcome.swept_blocks,
                    swept_bytes: outcome.swept_bytes,
                    duration_ms: outcome.duration_ms,
                },
            ));
        }

        outcome
    }

    /// Allow timer-driven cycles. The timer itself is configured separately
    /// by the collection driver.
    pub fn enable_collection(&self) {
        self.gc_enabled.store(true, Ordering::SeqCst);
        info!("timer-driven collection enabled");
    }

    /// Stop future timer-driven cycles; a cycle already underway completes.
    pub fn disable_collection(&self) {
        self.gc_enabled.store(false, Ordering::SeqCst);
        info!("timer-driven collection disabled");
    }

    pub fn collection_enabled(&self) -> bool {
        self.gc_enabled.load(Ordering::SeqCst)
    }
}
