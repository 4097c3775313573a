/*!
 * Core Types
 * Common types used across the heap
 */

/// Address type for heap operations: a byte offset into the managed region
pub type Address = usize;

/// Size type for heap operations
pub type Size = usize;

/// Stable arena index of a block record in the ledger
pub type BlockId = usize;
