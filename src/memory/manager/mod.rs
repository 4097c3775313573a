/*!
 * Heap Manager
 *
 * Strategy-driven allocator over a bump-grown region, with a conservative
 * mark-sweep collector gated by an explicit root set.
 *
 * ## Design
 *
 * - **Block ledger**: an arena of block records chained by index in address
 *   order; splits insert the remainder right after the candidate, growth
 *   appends at the tail.
 * - **Placement**: first-fit, best-fit, or worst-fit chosen per call.
 * - **Coalescing**: releasing a block merges it with free chain neighbors.
 * - **Collection**: mark from registered roots by payload-range containment,
 *   propagate along the chain, sweep blocks that are unmarked and free.
 * - **Safe points**: every operation holds the state lock for its whole
 *   critical section, so a timer-driven cycle can never see a transiently
 *   inconsistent ledger.
 */

mod allocator;
mod gc_ops;

use super::gc::RootRegistry;
use super::ledger::BlockLedger;
use super::region::HeapRegion;
use super::traits::{Allocator, GarbageCollector, HeapInspect, RootSet};
use super::types::{BlockSnapshot, HeapResult, HeapStats};
use crate::core::limits::DEFAULT_REGION_CAPACITY;
use crate::core::types::{Address, Size};
use crate::memory::gc::GcOutcome;
use crate::memory::placement::Strategy;
use crate::monitoring::EventCollector;
use log::info;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) struct HeapState {
    pub ledger: BlockLedger,
    pub region: HeapRegion,
    pub roots: RootRegistry,
}

/// Heap manager handle; clones share the same heap
pub struct HeapManager {
    pub(crate) state: Arc<Mutex<HeapState>>,
    pub(crate) gc_enabled: Arc<AtomicBool>,
    pub(crate) collections_run: Arc<AtomicU64>,
    collector: Option<Arc<EventCollector>>,
}

impl HeapManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REGION_CAPACITY)
    }

    /// Create a heap with a custom region ceiling (useful for testing)
    pub fn with_capacity(capacity: Size) -> Self {
        info!("heap manager initialized with {} byte region ceiling", capacity);
        Self {
            state: Arc::new(Mutex::new(HeapState {
                ledger: BlockLedger::new(),
                region: HeapRegion::with_capacity(capacity),
                roots: RootRegistry::new(),
            })),
            gc_enabled: Arc::new(AtomicBool::new(false)),
            collections_run: Arc::new(AtomicU64::new(0)),
            collector: None,
        }
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<EventCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Get collector reference
    pub fn collector(&self) -> Option<Arc<EventCollector>> {
        self.collector.clone()
    }

    pub fn stats(&self) -> HeapStats {
        let state = self.state.lock();
        HeapStats {
            capacity: state.region.capacity(),
            granted: state.region.granted(),
            ledger_bytes: state.ledger.ledger_bytes(),
            used_bytes: state.ledger.used_bytes(),
            free_bytes: state.ledger.free_bytes(),
            block_count: state.ledger.block_count(),
            free_block_count: state.ledger.free_block_count(),
            largest_free_block: state.ledger.largest_free_block(),
            root_count: state.roots.len(),
            collections_run: self.collections_run.load(Ordering::SeqCst),
        }
    }

    /// Diagnostic listing of every block's free flag, size, and addresses
    pub fn dump_heap_state(&self) -> Vec<BlockSnapshot> {
        let snapshot = self.state.lock().ledger.snapshot();
        for block in &snapshot {
            info!(
                "free={}, size={}, payload=0x{:x}, header=0x{:x}, next-header={}",
                block.free,
                block.size,
                block.payload,
                block.header,
                block
                    .next_header
                    .map_or_else(|| "none".into(), |next| format!("0x{:x}", next)),
            );
        }
        snapshot
    }
}

// Implement trait interfaces
impl Allocator for HeapManager {
    fn allocate(&self, strategy: Strategy, size: Size) -> HeapResult<Address> {
        HeapManager::allocate(self, strategy, size)
    }

    fn allocate_zeroed(
        &self,
        strategy: Strategy,
        count: Size,
        elem_size: Size,
    ) -> HeapResult<Address> {
        HeapManager::allocate_zeroed(self, strategy, count, elem_size)
    }

    fn release(&self, address: Address) {
        HeapManager::release(self, address)
    }

    fn is_valid(&self, address: Address) -> bool {
        HeapManager::is_valid(self, address)
    }

    fn block_size(&self, address: Address) -> Option<Size> {
        HeapManager::block_size(self, address)
    }
}

impl RootSet for HeapManager {
    fn register_root(&self, address: Address) -> bool {
        HeapManager::register_root(self, address)
    }

    fn unregister_root(&self, address: Address) {
        HeapManager::unregister_root(self, address)
    }

    fn root_count(&self) -> usize {
        HeapManager::root_count(self)
    }
}

impl GarbageCollector for HeapManager {
    fn collect_now(&self) -> GcOutcome {
        HeapManager::collect_now(self)
    }

    fn enable_collection(&self) {
        HeapManager::enable_collection(self)
    }

    fn disable_collection(&self) {
        HeapManager::disable_collection(self)
    }

    fn collection_enabled(&self) -> bool {
        HeapManager::collection_enabled(self)
    }
}

impl HeapInspect for HeapManager {
    fn stats(&self) -> HeapStats {
        HeapManager::stats(self)
    }

    fn dump_heap_state(&self) -> Vec<BlockSnapshot> {
        HeapManager::dump_heap_state(self)
    }
}

impl Clone for HeapManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            gc_enabled: Arc::clone(&self.gc_enabled),
            collections_run: Arc::clone(&self.collections_run),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for HeapManager {
    fn default() -> Self {
        Self::new()
    }
}
