/*!
 * Heap Limits and Constants
 *
 * Centralized location for all heap-wide limits and thresholds.
 * All values include rationale comments explaining WHY they exist.
 */

use crate::core::types::Size;

/// Per-block header overhead charged against the region (32 bytes)
/// Every block consumes `HEADER_BYTES + size` bytes of the region; split and
/// coalesce arithmetic must account for it symmetrically or the conservation
/// invariant breaks
pub const HEADER_BYTES: Size = 32;

/// Root registry capacity
/// The root set is deliberately tiny: roots are registered explicitly by the
/// embedding program, not discovered
pub const MAX_ROOTS: usize = 10;

/// Default region capacity (64MB)
/// Ceiling for the simulated growth primitive; tests shrink this to force
/// exhaustion deterministically
pub const DEFAULT_REGION_CAPACITY: Size = 64 * 1024 * 1024;

/// Default collection interval (2 seconds)
/// Used by the binary when no interval is configured
pub const DEFAULT_COLLECTION_INTERVAL_SECS: u64 = 2;
