/*!
 * Mark-Sweep Collector
 * Conservative collection over the block ledger
 *
 * Reachability is deliberately coarse: a root reaches the block whose payload
 * range contains its address, and marking propagates along the successor
 * chain to the end. The sweep narrows the free list only - a block still
 * flagged as allocated is never reclaimed, reachable or not.
 */

use super::roots::RootRegistry;
use crate::core::types::Size;
use crate::memory::ledger::BlockLedger;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of one collection cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GcOutcome {
    pub marked_blocks: usize,
    pub swept_blocks: usize,
    pub swept_bytes: Size,
    pub duration_ms: u64,
}

impl GcOutcome {
    pub fn swept_any(&self) -> bool {
        self.swept_blocks > 0
    }
}

/// Run one full mark-sweep cycle: reset marks, mark from every root, then
/// unlink blocks that are both unmarked and free.
pub(crate) fn run_cycle(ledger: &mut BlockLedger, roots: &RootRegistry) -> GcOutcome {
    let start = Instant::now();

    ledger.clear_marks();

    let mut marked_blocks = 0;
    for root in roots.iter() {
        if let Some(id) = ledger.find_containing(root) {
            marked_blocks += ledger.mark_from(id);
        }
    }

    let (swept_blocks, swept_bytes) = ledger.sweep_unmarked_free();

    GcOutcome {
        marked_blocks,
        swept_blocks,
        swept_bytes,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}
