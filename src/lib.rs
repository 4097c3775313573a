/*!
 * Strata Heap Library
 * Strategy-driven heap allocation with conservative mark-sweep collection
 */

pub mod core;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use memory::{
    Allocator, BlockSnapshot, CollectionDriver, GarbageCollector, GcOutcome, Heap, HeapError,
    HeapInspect, HeapManager, HeapResult, HeapStats, RootSet, Strategy,
};
pub use monitoring::{Category, Event, EventCollector, Payload, Severity};
