/*!
 * Event Collector
 * Fan-out distribution of heap events to subscribers
 */

use super::events::Event;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Collector statistics
#[derive(Debug, Clone, Default)]
pub struct CollectorStats {
    pub events_emitted: u64,
    pub events_unobserved: u64,
    pub active_subscribers: usize,
}

/// Observability collector: subsystems emit, subscribers consume
pub struct EventCollector {
    subscribers: Mutex<Vec<flume::Sender<Event>>>,
    emitted: AtomicU64,
    unobserved: AtomicU64,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            emitted: AtomicU64::new(0),
            unobserved: AtomicU64::new(0),
        }
    }

    /// Emit an event to every live subscriber. Subscribers whose receiver was
    /// dropped are pruned on the way through.
    pub fn emit(&self, event: Event) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if subscribers.is_empty() {
            self.unobserved.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> flume::Receiver<Event> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            events_emitted: self.emitted.load(Ordering::Relaxed),
            events_unobserved: self.unobserved.load(Ordering::Relaxed),
            active_subscribers: self.subscribers.lock().len(),
        }
    }
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new()
    }
}
