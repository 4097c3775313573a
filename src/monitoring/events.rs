/*!
 * Event System
 * Strongly-typed observability events for the heap
 */

use crate::core::types::{Address, Size};
use crate::memory::Strategy;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Event severity for filtering and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

/// Event category for organization and querying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Region,
    Allocator,
    Roots,
    Gc,
}

/// Unified event type - all heap observability flows through this
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    pub severity: Severity,
    pub category: Category,
    pub payload: Payload,
}

impl Event {
    pub fn new(severity: Severity, category: Category, payload: Payload) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            timestamp_ms,
            severity,
            category,
            payload,
        }
    }
}

/// Event payload - strongly typed variants for each event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    // Region events
    RegionGrown {
        bytes: Size,
        edge: Size,
    },

    // Allocator events
    BlockAllocated {
        address: Address,
        size: Size,
        strategy: Strategy,
        recycled: bool,
    },
    BlockSplit {
        address: Address,
        kept: Size,
        remainder: Size,
    },
    BlockReleased {
        address: Address,
        size: Size,
    },
    BlocksCoalesced {
        address: Address,
        merged_neighbors: usize,
        merged_size: Size,
    },
    UnknownRelease {
        address: Address,
    },

    // Root registry events
    RootRegistered {
        address: Address,
        occupied: usize,
    },
    RootRejected {
        address: Address,
    },
    RootUnregistered {
        address: Address,
        cleared: usize,
    },

    // Collection events
    GcCompleted {
        marked_blocks: usize,
        swept_blocks: usize,
        swept_bytes: Size,
        duration_ms: u64,
    },
}
