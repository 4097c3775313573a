/*!
 * Heap Types
 * Common types for heap management
 */

use crate::core::types::{Address, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Heap operation result
pub type HeapResult<T> = Result<T, HeapError>;

/// Heap errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("region exhausted: requested {requested} more bytes, {granted} of {capacity} byte ceiling already granted")]
    RegionExhausted {
        requested: Size,
        granted: Size,
        capacity: Size,
    },

    #[error("invalid allocation size: {requested} bytes")]
    InvalidSize { requested: Size },

    #[error("invalid payload address: 0x{0:x}")]
    InvalidAddress(Address),

    #[error("allocation size overflow: {count} elements of {elem_size} bytes each")]
    SizeOverflow { count: Size, elem_size: Size },

    #[error("invalid collection interval {interval:?}: must be positive")]
    InvalidInterval { interval: Duration },

    #[error("collection driver failed to start: {reason}")]
    DriverFailed { reason: String },
}

/// Heap-wide statistics at a quiescent point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeapStats {
    pub capacity: Size,
    pub granted: Size,
    /// Sum of every ledger block's payload size plus header overhead.
    /// Equals `granted` until a sweep discards unreachable free blocks.
    pub ledger_bytes: Size,
    pub used_bytes: Size,
    pub free_bytes: Size,
    pub block_count: usize,
    pub free_block_count: usize,
    pub largest_free_block: Size,
    pub root_count: usize,
    pub collections_run: u64,
}

impl HeapStats {
    pub fn usage_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            (self.used_bytes as f64 / self.capacity as f64) * 100.0
        }
    }
}

/// Point-in-time view of one ledger block, for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub free: bool,
    pub marked: bool,
    pub size: Size,
    pub header: Address,
    pub payload: Address,
    pub next_header: Option<Address>,
}
