/*!
 * Collection Driver
 * Periodic timer that triggers collection cycles at safe points
 *
 * The original design delivered the tick as an asynchronous interrupt that
 * could preempt the allocator mid-mutation. Here the tick runs on a dedicated
 * thread and every cycle goes through the manager's state lock, so a cycle
 * can never observe a mid-split or mid-coalesce ledger. Disabling collection
 * only gates future ticks; an in-flight cycle runs to completion.
 */

use crate::memory::manager::HeapManager;
use crate::memory::types::{HeapError, HeapResult};
use log::{debug, info};
use std::thread::JoinHandle;
use std::time::Duration;

pub struct CollectionDriver {
    // Dropping the sender disconnects the timer thread's receiver
    shutdown: Option<flume::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl CollectionDriver {
    /// Install a recurring timer that runs a collection cycle on every expiry,
    /// provided collection is enabled on the manager at that moment.
    ///
    /// A zero interval or a failed thread spawn is a fatal configuration
    /// error surfaced to the caller.
    pub fn configure(heap: HeapManager, interval: Duration) -> HeapResult<Self> {
        if interval.is_zero() {
            return Err(HeapError::InvalidInterval { interval });
        }

        let (shutdown_tx, shutdown_rx) = flume::bounded::<()>(0);
        let handle = std::thread::Builder::new()
            .name("strata-heap-gc".into())
            .spawn(move || loop {
                match shutdown_rx.recv_timeout(interval) {
                    Err(flume::RecvTimeoutError::Timeout) => {
                        if heap.collection_enabled() {
                            let outcome = heap.collect_now();
                            debug!(
                                "timer-driven cycle: {} marked, {} swept ({} bytes)",
                                outcome.marked_blocks, outcome.swept_blocks, outcome.swept_bytes
                            );
                        }
                    }
                    Ok(()) | Err(flume::RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| HeapError::DriverFailed {
                reason: e.to_string(),
            })?;

        info!("collection driver armed with {:?} interval", interval);
        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the timer and wait for the thread to exit. An in-flight cycle
    /// finishes before the thread observes the disconnect.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CollectionDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
