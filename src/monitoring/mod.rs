/*!
 * Monitoring Module
 * Heap observability: events and their distribution
 */

pub mod collector;
pub mod events;

pub use collector::{CollectorStats, EventCollector};
pub use events::{Category, Event, Payload, Severity};
