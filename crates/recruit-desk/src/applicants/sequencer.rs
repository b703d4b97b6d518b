use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation handed to each fetch so late responses can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(self) -> u64 {
        self.0
    }

    /// True when this ticket was issued after the one behind the `installed` generation.
    pub fn supersedes(self, installed: u64) -> bool {
        self.0 > installed
    }
}

/// Issues tickets in strictly increasing order.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
