//! Monotonic sequence gate for in-flight request ordering.
//!
//! The UI cannot cancel an in-flight fetch, so a slow response can arrive
//! after a newer request for the same logical operation has already been
//! issued. Each fetch takes a ticket before suspending and checks it after;
//! a ticket that is no longer current means the response is stale and must
//! be discarded rather than applied over newer data.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues monotonically increasing tickets for one logical operation.
#[derive(Debug, Default)]
pub struct SequenceGate {
    issued: AtomicU64,
}

impl SequenceGate {
    /// Create a gate with no tickets issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// Issue the next ticket. Call immediately before starting the request.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a ticket is still the latest issued.
    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}
