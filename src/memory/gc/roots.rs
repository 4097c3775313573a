/*!
 * Root Registry
 * Fixed-capacity set of externally supplied addresses treated as live
 *
 * Entries are weak: the registry never owns the referenced payload and never
 * frees it. Registration is explicit and so is removal; the collector only
 * reads the registry, it never mutates it.
 */

use crate::core::limits::MAX_ROOTS;
use crate::core::types::Address;

#[derive(Debug, Default)]
pub struct RootRegistry {
    slots: [Option<Address>; MAX_ROOTS],
}

impl RootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `address` in the first empty slot. Returns `false` when the
    /// registry is full; existing entries are left untouched.
    pub fn register(&mut self, address: Address) -> bool {
        for slot in self.slots.iter_mut() {
            if slot.is_none() {
                *slot = Some(address);
                return true;
            }
        }
        false
    }

    /// Clear every slot matching `address` (defensive against duplicate
    /// registrations). Returns how many slots were cleared.
    pub fn unregister(&mut self, address: Address) -> usize {
        let mut cleared = 0;
        for slot in self.slots.iter_mut() {
            if *slot == Some(address) {
                *slot = None;
                cleared += 1;
            }
        }
        cleared
    }

    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        MAX_ROOTS
    }
}
