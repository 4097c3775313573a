/*!
 * Placement Strategies
 * First-fit, best-fit, and worst-fit searches over the block ledger
 *
 * Shared contract: return a previously free block with `size >= request`, now
 * claimed, or grow the region at the tail. A candidate is split only when its
 * capacity strictly exceeds `request + HEADER_BYTES` (an exact-slack block is
 * claimed whole). First-fit accepts any free block with `size >= request`;
 * best- and worst-fit require `size >= request + HEADER_BYTES` and resolve
 * ties by first encounter. Growth failure is a hard error, never retried.
 */

use super::ledger::BlockLedger;
use super::region::HeapRegion;
use super::types::{HeapError, HeapResult};
use crate::core::limits::HEADER_BYTES;
use crate::core::types::{BlockId, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    FirstFit,
    BestFit,
    WorstFit,
}

impl Strategy {
    /// Parse a selector; unrecognized input defaults to first-fit
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "best" | "best-fit" | "best_fit" => Strategy::BestFit,
            "worst" | "worst-fit" | "worst_fit" => Strategy::WorstFit,
            _ => Strategy::FirstFit,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::FirstFit => write!(f, "first-fit"),
            Strategy::BestFit => write!(f, "best-fit"),
            Strategy::WorstFit => write!(f, "worst-fit"),
        }
    }
}

/// How a request was satisfied
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub id: BlockId,
    pub split_remainder: Option<Size>,
    pub grown: bool,
}

pub(crate) fn place(
    ledger: &mut BlockLedger,
    region: &mut HeapRegion,
    strategy: Strategy,
    request: Size,
) -> HeapResult<Placement> {
    let candidate = match strategy {
        Strategy::FirstFit => first_fit(ledger, request),
        Strategy::BestFit => best_fit(ledger, request),
        Strategy::WorstFit => worst_fit(ledger, request),
    };

    match candidate {
        Some(id) => {
            let capacity = ledger.block(id).size();
            // Strict: enough slack must remain for a second header plus payload
            if capacity > request + HEADER_BYTES {
                ledger.split(id, request);
                Ok(Placement {
                    id,
                    split_remainder: Some(capacity - request - HEADER_BYTES),
                    grown: false,
                })
            } else {
                ledger.claim(id);
                Ok(Placement {
                    id,
                    split_remainder: None,
                    grown: false,
                })
            }
        }
        None => {
            let id = grow_tail(ledger, region, request)?;
            Ok(Placement {
                id,
                split_remainder: None,
                grown: true,
            })
        }
    }
}

fn first_fit(ledger: &BlockLedger, request: Size) -> Option<BlockId> {
    ledger
        .iter()
        .find(|(_, block)| block.is_free() && block.size() >= request)
        .map(|(id, _)| id)
}

fn best_fit(ledger: &BlockLedger, request: Size) -> Option<BlockId> {
    let needed = request.checked_add(HEADER_BYTES)?;
    let mut best: Option<(BlockId, Size)> = None;
    for (id, block) in ledger.iter() {
        if block.is_free() && block.size() >= needed {
            // Strict comparison keeps the first-encountered block on ties
            if best.map_or(true, |(_, size)| block.size() < size) {
                best = Some((id, block.size()));
            }
        }
    }
    best.map(|(id, _)| id)
}

fn worst_fit(ledger: &BlockLedger, request: Size) -> Option<BlockId> {
    let needed = request.checked_add(HEADER_BYTES)?;
    let mut worst: Option<(BlockId, Size)> = None;
    for (id, block) in ledger.iter() {
        if block.is_free() && block.size() >= needed {
            if worst.map_or(true, |(_, size)| block.size() > size) {
                worst = Some((id, block.size()));
            }
        }
    }
    worst.map(|(id, _)| id)
}

/// Grow the region by one header plus `request` payload bytes and append the
/// resulting block at the chain tail.
fn grow_tail(
    ledger: &mut BlockLedger,
    region: &mut HeapRegion,
    request: Size,
) -> HeapResult<BlockId> {
    let total = request
        .checked_add(HEADER_BYTES)
        .ok_or(HeapError::InvalidSize { requested: request })?;
    let header = region.grow_by(total)?;
    Ok(ledger.append_grown(header, request))
}
