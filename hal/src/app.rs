//! # Application Seam
//!
//! Everything the protocol core hands upward to the product firmware:
//! indications (lamp, idle/error entry), platform requests (reset, boot
//! loader), the application register space, decision-matrix actions and
//! event callouts. One board-support object implements the whole trait;
//! hooks the product does not care about keep their default no-op bodies.

use vscp_events::RxEvent;

/// Status lamp states driven by the node lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampState {
    /// Lamp off (idle, reset, error).
    Off,
    /// Lamp on (active on the segment).
    On,
    /// Slow blinking (starting up).
    BlinkSlow,
    /// Fast blinking (nickname discovery).
    BlinkFast,
}

/// Application hooks of a node.
pub trait Application {
    /// One-time set-up, called from the core's `init`.
    fn init(&mut self) {}

    /// Restore application state to factory defaults. Called as the last
    /// step of the core's factory reset.
    fn restore_defaults(&mut self) {}

    /// Drive the status lamp.
    fn set_lamp(&mut self, state: LampState);

    /// The node entered IDLE and will not process events anymore.
    fn idle_entered(&mut self) {}

    /// The node entered the terminal ERROR state.
    fn error_entered(&mut self) {}

    /// Request a platform reset. The platform may defer it, but the core
    /// asks exactly once per RESET state.
    fn reset_request(&mut self);

    /// Boot-loader algorithm implemented by the platform, 0xFF = none.
    fn boot_loader_algorithm(&mut self) -> u8 {
        0xFF
    }

    /// Jump to the boot loader. Only called after a fully validated
    /// ENTER_BOOT_LOADER request.
    fn boot_loader_request(&mut self) {}

    /// A non-PROTOCOL event arrived.
    fn provide_event(&mut self, event: &RxEvent);

    /// A PROTOCOL event arrived; return `true` to take it over and keep
    /// the core dispatcher out of it.
    fn provide_protocol_event(&mut self, event: &RxEvent) -> bool {
        let _ = event;
        false
    }

    /// The segment master broadcast a new unix timestamp.
    fn update_time_since_epoch(&mut self, timestamp: u32) {
        let _ = timestamp;
    }

    /// Emit the node heartbeat instead of the core. Return `true` when
    /// handled; the core then skips its standard heartbeat event.
    fn node_heartbeat(&mut self) -> bool {
        false
    }

    /// Number of register pages the application uses.
    fn reg_pages_used(&mut self) -> u8 {
        1
    }

    /// Read an application register.
    fn reg_read(&mut self, page: u16, addr: u8) -> u8;

    /// Write an application register and return the stored value.
    fn reg_write(&mut self, page: u16, addr: u8, value: u8) -> u8;

    /// Execute a decision-matrix action.
    fn execute_action(&mut self, action: u8, param: u8, event: &RxEvent);
}
