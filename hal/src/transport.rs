//! # Transport Seam
//!
//! Frame-level access to the communication bus. Both directions are
//! non-blocking; the core polls `read` once per process cycle and retries
//! rejected writes on later cycles.

use vscp_events::{RxEvent, TxEvent};

/// Non-blocking event transport.
pub trait Transport {
    /// Fetch the next received event, if one is pending.
    fn read(&mut self) -> Option<RxEvent>;

    /// Queue an event for transmission. Returns `false` when the transport
    /// cannot accept the frame right now; the caller may retry later.
    fn write(&mut self, event: &TxEvent) -> bool;
}
