/*!
 * Block Ledger
 * Arena-backed chain of block headers in address order
 *
 * Blocks are records in a slot arena addressed by stable `BlockId` indices;
 * the ownership chain of the original header list becomes a `next` index
 * field. Invariant: following `next` from the head visits strictly increasing
 * header addresses, because new blocks are created either by splitting
 * (remainder inserted immediately after, at a higher address) or by appending
 * at the region's growth edge.
 */

use crate::core::limits::HEADER_BYTES;
use crate::core::types::{Address, BlockId, Size};
use crate::memory::types::BlockSnapshot;

/// One allocation unit: notional header plus payload
#[derive(Debug, Clone)]
pub struct Block {
    next: Option<BlockId>,
    header: Address,
    size: Size,
    free: bool,
    marked: bool,
}

impl Block {
    pub fn payload(&self) -> Address {
        self.header + HEADER_BYTES
    }

    pub fn payload_end(&self) -> Address {
        self.payload() + self.size
    }

    /// Conservative reachability test: raw address-range containment
    pub fn contains(&self, address: Address) -> bool {
        address >= self.payload() && address < self.payload_end()
    }

    pub fn header(&self) -> Address {
        self.header
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn next(&self) -> Option<BlockId> {
        self.next
    }
}

/// What `release_at` did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Block left holding the freed range (the predecessor after a backward merge)
    pub block: BlockId,
    /// Payload size of the block named in the release call
    pub released_size: Size,
    /// Chain neighbors absorbed (0, 1, or 2)
    pub merged_neighbors: usize,
    /// Payload size of the surviving block after coalescing
    pub merged_size: Size,
}

#[derive(Debug, Default)]
pub struct BlockLedger {
    slots: Vec<Option<Block>>,
    recycled: Vec<BlockId>,
    head: Option<BlockId>,
}

impl BlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<BlockId> {
        self.head
    }

    pub fn block(&self, id: BlockId) -> &Block {
        self.slots[id].as_ref().expect("vacant ledger slot")
    }

    fn block_mut(&mut self, id: BlockId) -> &mut Block {
        self.slots[id].as_mut().expect("vacant ledger slot")
    }

    fn insert(&mut self, block: Block) -> BlockId {
        match self.recycled.pop() {
            Some(id) => {
                self.slots[id] = Some(block);
                id
            }
            None => {
                self.slots.push(Some(block));
                self.slots.len() - 1
            }
        }
    }

    fn discard(&mut self, id: BlockId) -> Block {
        let block = self.slots[id].take().expect("vacant ledger slot");
        self.recycled.push(id);
        block
    }

    /// Iterate the chain in address order
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            ledger: self,
            cursor: self.head,
        }
    }

    fn tail(&self) -> Option<BlockId> {
        self.iter().map(|(id, _)| id).last()
    }

    /// Install a freshly grown block at the tail (highest address so far)
    pub fn append_grown(&mut self, header: Address, size: Size) -> BlockId {
        let tail = self.tail();
        let id = self.insert(Block {
            next: None,
            header,
            size,
            free: false,
            marked: false,
        });
        match tail {
            Some(tail) => self.block_mut(tail).next = Some(id),
            None => self.head = Some(id),
        }
        id
    }

    /// Claim an entire free block as-is (internal fragmentation accepted)
    pub fn claim(&mut self, id: BlockId) {
        self.block_mut(id).free = false;
    }

    /// Carve `request` bytes off the front of a free block; the remainder
    /// becomes an independent free block whose header sits right after the
    /// consumed payload.
    ///
    /// Caller must have checked `size > request + HEADER_BYTES` (strict: an
    /// exact-slack block is claimed whole, never split).
    pub fn split(&mut self, id: BlockId, request: Size) -> BlockId {
        let (remainder_header, remainder_size, successor) = {
            let block = self.block(id);
            debug_assert!(block.free && block.size > request + HEADER_BYTES);
            (
                block.payload() + request,
                block.size - request - HEADER_BYTES,
                block.next,
            )
        };

        let remainder = self.insert(Block {
            next: successor,
            header: remainder_header,
            size: remainder_size,
            free: true,
            marked: false,
        });

        let block = self.block_mut(id);
        block.next = Some(remainder);
        block.size = request;
        block.free = false;
        remainder
    }

    pub fn find_by_payload(&self, address: Address) -> Option<BlockId> {
        self.iter()
            .find(|(_, block)| block.payload() == address)
            .map(|(id, _)| id)
    }

    /// Block whose payload range contains `address`, if any
    pub fn find_containing(&self, address: Address) -> Option<BlockId> {
        self.iter()
            .find(|(_, block)| block.contains(address))
            .map(|(id, _)| id)
    }

    /// Free the block whose payload starts at `address`, coalescing with the
    /// immediate chain neighbors when they are also free. Backward merge runs
    /// first; the forward merge then operates on the merged block. Only
    /// immediate neighbors are considered.
    ///
    /// Returns `None` when no block owns the address (a deliberate no-op for
    /// double-free-tolerant callers, not a correctness guarantee).
    pub fn release_at(&mut self, address: Address) -> Option<ReleaseOutcome> {
        let mut prev: Option<BlockId> = None;
        let mut found: Option<BlockId> = None;
        for (id, block) in self.iter() {
            if block.payload() == address {
                found = Some(id);
                break;
            }
            prev = Some(id);
        }

        let mut current = found?;
        let released_size = self.block(current).size;
        self.block_mut(current).free = true;
        let mut merged_neighbors = 0;

        if let Some(prev) = prev {
            if self.block(prev).is_free() {
                let absorbed = self.discard(current);
                let prev_block = self.block_mut(prev);
                prev_block.size += HEADER_BYTES + absorbed.size;
                prev_block.next = absorbed.next;
                current = prev;
                merged_neighbors += 1;
            }
        }

        if let Some(next) = self.block(current).next {
            if self.block(next).is_free() {
                let absorbed = self.discard(next);
                let block = self.block_mut(current);
                block.size += HEADER_BYTES + absorbed.size;
                block.next = absorbed.next;
                merged_neighbors += 1;
            }
        }

        Some(ReleaseOutcome {
            block: current,
            released_size,
            merged_neighbors,
            merged_size: self.block(current).size,
        })
    }

    /// Reset every block's mark (start of a collection cycle)
    pub fn clear_marks(&mut self) {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let block = self.block_mut(id);
            block.marked = false;
            cursor = block.next;
        }
    }

    /// Mark `id` and every successor to the end of the chain. Propagation
    /// stops at an already-marked block: everything past it was marked by the
    /// same cycle. Returns the number of newly marked blocks.
    pub fn mark_from(&mut self, id: BlockId) -> usize {
        let mut newly_marked = 0;
        let mut cursor = Some(id);
        while let Some(id) = cursor {
            let block = self.block_mut(id);
            if block.marked {
                break;
            }
            block.marked = true;
            newly_marked += 1;
            cursor = block.next;
        }
        newly_marked
    }

    /// Unlink every block that is simultaneously unmarked and free, splicing
    /// the chain around it. Unmarked-but-allocated blocks are never reclaimed.
    /// Returns (blocks swept, payload bytes swept).
    pub fn sweep_unmarked_free(&mut self) -> (usize, Size) {
        let mut swept_blocks = 0;
        let mut swept_bytes = 0;
        let mut prev: Option<BlockId> = None;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            let block = self.block(id);
            if !block.marked && block.free {
                let discarded = self.discard(id);
                match prev {
                    Some(prev) => self.block_mut(prev).next = discarded.next,
                    None => self.head = discarded.next,
                }
                swept_blocks += 1;
                swept_bytes += discarded.size;
                cursor = discarded.next;
            } else {
                prev = Some(id);
                cursor = block.next;
            }
        }

        (swept_blocks, swept_bytes)
    }

    pub fn block_count(&self) -> usize {
        self.iter().count()
    }

    pub fn free_block_count(&self) -> usize {
        self.iter().filter(|(_, b)| b.free).count()
    }

    pub fn free_bytes(&self) -> Size {
        self.iter().filter(|(_, b)| b.free).map(|(_, b)| b.size).sum()
    }

    pub fn used_bytes(&self) -> Size {
        self.iter().filter(|(_, b)| !b.free).map(|(_, b)| b.size).sum()
    }

    /// Payload plus header bytes accounted for along the chain. Matches the
    /// region's granted byte count at every quiescent point until a sweep
    /// discards unreachable free blocks.
    pub fn ledger_bytes(&self) -> Size {
        self.iter().map(|(_, b)| b.size + HEADER_BYTES).sum()
    }

    pub fn largest_free_block(&self) -> Size {
        self.iter()
            .filter(|(_, b)| b.free)
            .map(|(_, b)| b.size)
            .max()
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> Vec<BlockSnapshot> {
        self.iter()
            .map(|(_, block)| BlockSnapshot {
                free: block.free,
                marked: block.marked,
                size: block.size,
                header: block.header,
                payload: block.payload(),
                next_header: block.next.map(|next| self.block(next).header),
            })
            .collect()
    }
}

pub struct ChainIter<'a> {
    ledger: &'a BlockLedger,
    cursor: Option<BlockId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let block = self.ledger.block(id);
        self.cursor = block.next;
        Some((id, block))
    }
}
