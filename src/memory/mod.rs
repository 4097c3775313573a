/*!
 * Memory Module
 * Region, ledger, placement, management, and collection
 */

pub mod gc;
pub mod ledger;
pub mod manager;
pub mod placement;
pub mod region;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use gc::{CollectionDriver, GcOutcome, RootRegistry};
pub use ledger::{Block, BlockLedger, ReleaseOutcome};
pub use manager::HeapManager;
pub use placement::Strategy;
pub use region::HeapRegion;
pub use traits::*;
pub use types::*;
