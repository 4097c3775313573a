/*!
 * Heap Region
 * Contiguous byte range obtained from the simulated growth primitive
 *
 * The region only ever grows (bump allocation at the edge); freed blocks
 * reduce logical fragmentation inside it but never shrink it.
 */

use super::types::{HeapError, HeapResult};
use crate::core::types::{Address, Size};
use log::{debug, error};

#[derive(Debug)]
pub struct HeapRegion {
    bytes: Vec<u8>,
    capacity: Size,
}

impl HeapRegion {
    /// Create a region with a growth ceiling (the "address space" the host
    /// is willing to grant)
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            bytes: Vec::new(),
            capacity,
        }
    }

    /// Request `request` more contiguous bytes at the growth edge.
    ///
    /// Returns the address of the granted range, or `RegionExhausted` when the
    /// ceiling would be crossed. Callers must treat failure as a hard
    /// allocation failure, never retry in a loop.
    pub fn grow_by(&mut self, request: Size) -> HeapResult<Address> {
        let edge = self.bytes.len();
        let available = self.capacity - edge;
        if request > available {
            error!(
                "region exhausted: requested {} bytes with only {} of {} remaining",
                request, available, self.capacity
            );
            return Err(HeapError::RegionExhausted {
                requested: request,
                granted: edge,
                capacity: self.capacity,
            });
        }

        self.bytes.resize(edge + request, 0);
        debug!(
            "region grew by {} bytes, edge now {} / {}",
            request,
            self.bytes.len(),
            self.capacity
        );
        Ok(edge)
    }

    /// Total bytes granted so far
    pub fn granted(&self) -> Size {
        self.bytes.len()
    }

    pub fn capacity(&self) -> Size {
        self.capacity
    }

    pub fn payload(&self, address: Address, len: Size) -> &[u8] {
        &self.bytes[address..address + len]
    }

    pub fn payload_mut(&mut self, address: Address, len: Size) -> &mut [u8] {
        &mut self.bytes[address..address + len]
    }

    /// Zero-fill a payload range (reused blocks carry stale bytes)
    pub fn zero(&mut self, address: Address, len: Size) {
        self.payload_mut(address, len).fill(0);
    }
}
