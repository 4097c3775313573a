/*!
 * Heap Allocator Implementation
 * Allocation, release, and root registration logic
 */

use super::{HeapManager, HeapState};
use crate::core::limits::HEADER_BYTES;
use crate::core::types::{Address, Size};
use crate::memory::placement::{place, Strategy};
use crate::memory::types::{HeapError, HeapResult};
use crate::monitoring::{Category, Event, Payload, Severity};
use log::{error, info, warn};

impl HeapManager {
    /// Allocate a payload of `size` bytes using the given placement strategy.
    ///
    /// The whole search/split/grow sequence is one critical section; a
    /// timer-driven collection cycle can only run before or after it.
    pub fn allocate(&self, strategy: Strategy, size: Size) -> HeapResult<Address> {
        self.allocate_inner(strategy, size, false)
    }

    /// Allocate `count * elem_size` zero-filled bytes.
    ///
    /// The multiplication is overflow-checked before any placement runs.
    pub fn allocate_zeroed(
        &self,
        strategy: Strategy,
        count: Size,
        elem_size: Size,
    ) -> HeapResult<Address> {
        let size = count
            .checked_mul(elem_size)
            .ok_or(HeapError::SizeOverflow { count, elem_size })?;
        self.allocate_inner(strategy, size, true)
    }

    fn allocate_inner(&self, strategy: Strategy, size: Size, zero: bool) -> HeapResult<Address> {
        if size == 0 {
            warn!("rejected zero-sized {} allocation", strategy);
            return Err(HeapError::InvalidSize { requested: 0 });
        }

        let mut state = self.state.lock();
        let HeapState { ledger, region, .. } = &mut *state;

        let placement = match place(ledger, region, strategy, size) {
            Ok(placement) => placement,
            Err(err) => {
                error!("{} allocation of {} bytes failed: {}", strategy, size, err);
                return Err(err);
            }
        };

        let address = ledger.block(placement.id).payload();
        if zero {
            region.zero(address, size);
        }
        let edge = region.granted();
        drop(state);

        info!(
            "allocated {} bytes at 0x{:x} via {} ({})",
            size,
            address,
            strategy,
            if placement.grown { "grown" } else { "recycled" },
        );

        if let Some(ref collector) = self.collector() {
            if placement.grown {
                collector.emit(Event::new(
                    Severity::Info,
                    Category::Region,
                    Payload::RegionGrown {
                        bytes: size + HEADER_BYTES,
                        edge,
                    },
                ));
            }
            if let Some(remainder) = placement.split_remainder {
                collector.emit(Event::new(
                    Severity::Debug,
                    Category::Allocator,
                    Payload::BlockSplit {
                        address,
                        kept: size,
                        remainder,
                    },
                ));
            }
            collector.emit(Event::new(
                Severity::Debug,
                Category::Allocator,
                Payload::BlockAllocated {
                    address,
                    size,
                    strategy,
                    recycled: !placement.grown,
                },
            ));
        }

        Ok(address)
    }

    /// Free the block whose payload starts at `address` and coalesce with
    /// free chain neighbors. Unknown addresses are a silent no-op (observable
    /// through the event stream, never an error).
    pub fn release(&self, address: Address) {
        let mut state = self.state.lock();
        let outcome = state.ledger.release_at(address);
        let merged_payload =
            outcome.map(|outcome| state.ledger.block(outcome.block).payload());
        drop(state);

        match (outcome, merged_payload) {
            (Some(outcome), Some(merged_payload)) => {
                info!(
                    "released {} bytes at 0x{:x}, {} neighbor(s) coalesced",
                    outcome.released_size, address, outcome.merged_neighbors,
                );
                if let Some(ref collector) = self.collector() {
                    collector.emit(Event::new(
                        Severity::Debug,
                        Category::Allocator,
                        Payload::BlockReleased {
                            address,
                            size: outcome.released_size,
                        },
                    ));
                    if outcome.merged_neighbors > 0 {
                        collector.emit(Event::new(
                            Severity::Debug,
                            Category::Allocator,
                            Payload::BlocksCoalesced {
                                address: merged_payload,
                                merged_neighbors: outcome.merged_neighbors,
                                merged_size: outcome.merged_size,
                            },
                        ));
                    }
                }
            }
            _ => {
                warn!("release of unknown address 0x{:x} ignored", address);
                if let Some(ref collector) = self.collector() {
                    collector.emit(Event::new(
                        Severity::Warn,
                        Category::Allocator,
                        Payload::UnknownRelease { address },
                    ));
                }
            }
        }
    }

    /// Copy bytes into an allocated payload, bounds-checked against the block
    pub fn write_payload(&self, address: Address, bytes: &[u8]) -> HeapResult<()> {
        let mut state = self.state.lock();
        let HeapState { ledger, region, .. } = &mut *state;
        let id = ledger
            .find_by_payload(address)
            .filter(|&id| !ledger.block(id).is_free())
            .ok_or(HeapError::InvalidAddress(address))?;
        if bytes.len() > ledger.block(id).size() {
            return Err(HeapError::InvalidSize {
                requested: bytes.len(),
            });
        }
        region.payload_mut(address, bytes.len()).copy_from_slice(bytes);
        Ok(())
    }

    /// Copy `len` bytes out of an allocated payload
    pub fn read_payload(&self, address: Address, len: Size) -> HeapResult<Vec<u8>> {
        let state = self.state.lock();
        let id = state
            .ledger
            .find_by_payload(address)
            .filter(|&id| !state.ledger.block(id).is_free())
            .ok_or(HeapError::InvalidAddress(address))?;
        if len > state.ledger.block(id).size() {
            return Err(HeapError::InvalidSize { requested: len });
        }
        Ok(state.region.payload(address, len).to_vec())
    }

    /// Check if an address is the payload start of an allocated block
    pub fn is_valid(&self, address: Address) -> bool {
        let state = self.state.lock();
        state
            .ledger
            .find_by_payload(address)
            .map_or(false, |id| !state.ledger.block(id).is_free())
    }

    /// Get the payload size of the block starting at `address`
    pub fn block_size(&self, address: Address) -> Option<Size> {
        let state = self.state.lock();
        state
            .ledger
            .find_by_payload(address)
            .map(|id| state.ledger.block(id).size())
    }

    /// Register a live address in the root set. Returns `false` when the
    /// registry is full; the entry is dropped and existing roots are left
    /// untouched.
    pub fn register_root(&self, address: Address) -> bool {
        let mut state = self.state.lock();
        let accepted = state.roots.register(address);
        let occupied = state.roots.len();
        drop(state);

        if accepted {
            info!("registered root 0x{:x} ({} slots occupied)", address, occupied);
        } else {
            warn!("root registry full, dropping root 0x{:x}", address);
        }
        if let Some(ref collector) = self.collector() {
            let payload = if accepted {
                Payload::RootRegistered { address, occupied }
            } else {
                Payload::RootRejected { address }
            };
            let severity = if accepted { Severity::Debug } else { Severity::Warn };
            collector.emit(Event::new(severity, Category::Roots, payload));
        }
        accepted
    }

    /// Clear every root slot matching `address` (duplicate-safe)
    pub fn unregister_root(&self, address: Address) {
        let mut state = self.state.lock();
        let cleared = state.roots.unregister(address);
        drop(state);

        info!("unregistered root 0x{:x} ({} slots cleared)", address, cleared);
        if let Some(ref collector) = self.collector() {
            collector.emit(Event::new(
                Severity::Debug,
                Category::Roots,
                Payload::RootUnregistered { address, cleared },
            ));
        }
    }

    pub fn root_count(&self) -> usize {
        self.state.lock().roots.len()
    }
}
