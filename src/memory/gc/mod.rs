/*!
 * Garbage Collection
 * Root registry, mark-sweep cycle, and the periodic driver
 */

pub mod collector;
pub mod driver;
pub mod roots;

pub use collector::GcOutcome;
pub use driver::CollectionDriver;
pub use roots::RootRegistry;
