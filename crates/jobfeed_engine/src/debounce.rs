//! Cancellable scheduled task for debounced input.
//!
//! Arming hands out a ticket tagged with a generation number; re-arming or
//! cancelling bumps the generation, so a superseded ticket reports itself
//! dead after its sleep instead of firing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Arms the timer, invalidating any previously armed ticket.
    pub fn arm(&self) -> DebounceTicket {
        let expected = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        DebounceTicket {
            delay: self.delay,
            expected,
            generation: Arc::clone(&self.generation),
        }
    }

    /// Invalidates any armed ticket without arming a new one.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct DebounceTicket {
    delay: Duration,
    expected: u64,
    generation: Arc<AtomicU64>,
}

impl DebounceTicket {
    /// Sleeps the debounce window and reports whether this ticket is still
    /// the current one.
    pub async fn wait(self) -> bool {
        tokio::time::sleep(self.delay).await;
        self.generation.load(Ordering::SeqCst) == self.expected
    }
}
