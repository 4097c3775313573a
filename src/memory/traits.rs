/*!
 * Heap Traits
 * Heap management abstractions
 */

use super::gc::GcOutcome;
use super::placement::Strategy;
use super::types::{BlockSnapshot, HeapResult, HeapStats};
use crate::core::types::{Address, Size};

/// Allocator interface
pub trait Allocator: Send + Sync {
    /// Allocate a payload of `size` bytes using the given placement strategy
    fn allocate(&self, strategy: Strategy, size: Size) -> HeapResult<Address>;

    /// Allocate `count * elem_size` zero-filled bytes; the multiplication is
    /// checked for overflow before delegating
    fn allocate_zeroed(&self, strategy: Strategy, count: Size, elem_size: Size)
        -> HeapResult<Address>;

    /// Free the block whose payload starts at `address`; silent no-op on an
    /// unknown address
    fn release(&self, address: Address);

    /// Check if an address is the payload start of an allocated block
    fn is_valid(&self, address: Address) -> bool;

    /// Get the payload size of the block starting at `address`
    fn block_size(&self, address: Address) -> Option<Size>;
}

/// Root set management
pub trait RootSet: Send + Sync {
    /// Register a live address; `false` means the registry is full and the
    /// entry was dropped
    fn register_root(&self, address: Address) -> bool;

    /// Clear every registry slot matching `address`
    fn unregister_root(&self, address: Address);

    fn root_count(&self) -> usize;
}

/// Garbage collection interface
pub trait GarbageCollector: Send + Sync {
    /// Run a synchronous mark-sweep cycle
    fn collect_now(&self) -> GcOutcome;

    /// Allow timer-driven cycles
    fn enable_collection(&self);

    /// Stop future timer-driven cycles; an in-flight cycle completes
    fn disable_collection(&self);

    fn collection_enabled(&self) -> bool;
}

/// Heap diagnostics
pub trait HeapInspect: Send + Sync {
    fn stats(&self) -> HeapStats;

    /// Diagnostic listing of every ledger block
    fn dump_heap_state(&self) -> Vec<BlockSnapshot>;
}

/// Full heap surface combining all interfaces
pub trait Heap: Allocator + RootSet + GarbageCollector + HeapInspect + Clone + Send + Sync {}

/// Implement Heap for types that implement all required traits
impl<T> Heap for T where
    T: Allocator + RootSet + GarbageCollector + HeapInspect + Clone + Send + Sync
{
}
