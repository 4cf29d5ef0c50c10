//! # Simulated Board
//!
//! Test doubles for the three platform seams. Everything is observable:
//! sent frames pile up in [`SimBus::sent`], executed actions and lifecycle
//! callouts are recorded on [`SimApp`].

use heapless::{Deque, Vec};
use vscp_core::Node;
use vscp_events::{RxEvent, TxEvent};
use vscp_hal::{Application, ArrayNvm, LampState, Transport};
use vscp_storage::layout;

/// RAM persistence sized for the active layout.
pub type NodeNvm = ArrayNvm<{ layout::TOTAL_SIZE as usize }>;

/// A fully simulated node.
pub type SimNode = Node<SimBus, NodeNvm, SimApp>;

// =============================================================================
// TRANSPORT
// =============================================================================

/// Queue-backed transport double.
#[derive(Debug, Default)]
pub struct SimBus {
    /// Frames waiting to be received by the node.
    pub pending: Deque<RxEvent, 16>,
    /// Frames the node sent, oldest first.
    pub sent: Deque<TxEvent, 64>,
    /// When `true`, every write is rejected (bus congested).
    pub reject_writes: bool,
}

impl SimBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame for the node to receive.
    pub fn inject(&mut self, event: RxEvent) {
        self.pending
            .push_back(event)
            .expect("receive queue overflow");
    }

    /// Take the oldest sent frame.
    pub fn take_sent(&mut self) -> Option<TxEvent> {
        self.sent.pop_front()
    }
}

impl Transport for SimBus {
    fn read(&mut self) -> Option<RxEvent> {
        self.pending.pop_front()
    }

    fn write(&mut self, event: &TxEvent) -> bool {
        if self.reject_writes {
            return false;
        }
        self.sent.push_back(event.clone()).is_ok()
    }
}

// =============================================================================
// APPLICATION
// =============================================================================

/// Recording application double with a deterministic register space:
/// reading application register `(page, addr)` yields `page + addr`
/// (wrapping, low byte) until something is written over it.
#[derive(Debug)]
pub struct SimApp {
    /// Current lamp state.
    pub lamp: LampState,
    /// Executed decision-matrix actions `(action, param)`.
    pub actions: Vec<(u8, u8), 16>,
    /// Register writes forwarded to the application `(page, addr, value)`.
    pub reg_writes: Vec<(u16, u8, u8), 16>,
    /// Non-PROTOCOL events delivered to the application.
    pub delivered: usize,
    /// Reset requests seen.
    pub reset_requests: usize,
    /// Boot-loader requests seen.
    pub boot_requests: usize,
    /// Times the node reported entering IDLE.
    pub idle_entries: usize,
    /// Times the node reported entering ERROR.
    pub error_entries: usize,
    /// Last epoch timestamp pushed by the segment master.
    pub epoch_updates: Option<u32>,
    /// Boot-loader algorithm the board claims to support.
    pub boot_algorithm: u8,
    overrides: Vec<(u16, u8, u8), 16>,
}

impl SimApp {
    /// Fresh application state, no boot loader.
    pub fn new() -> Self {
        Self {
            lamp: LampState::Off,
            actions: Vec::new(),
            reg_writes: Vec::new(),
            delivered: 0,
            reset_requests: 0,
            boot_requests: 0,
            idle_entries: 0,
            error_entries: 0,
            epoch_updates: None,
            boot_algorithm: 0xFF,
            overrides: Vec::new(),
        }
    }
}

impl Default for SimApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Application for SimApp {
    fn set_lamp(&mut self, state: LampState) {
        self.lamp = state;
    }

    fn idle_entered(&mut self) {
        self.idle_entries += 1;
    }

    fn error_entered(&mut self) {
        self.error_entries += 1;
    }

    fn reset_request(&mut self) {
        self.reset_requests += 1;
    }

    fn boot_loader_algorithm(&mut self) -> u8 {
        self.boot_algorithm
    }

    fn boot_loader_request(&mut self) {
        self.boot_requests += 1;
    }

    fn provide_event(&mut self, _event: &RxEvent) {
        self.delivered += 1;
    }

    fn update_time_since_epoch(&mut self, timestamp: u32) {
        self.epoch_updates = Some(timestamp);
    }

    fn reg_read(&mut self, page: u16, addr: u8) -> u8 {
        for (p, a, v) in self.overrides.iter() {
            if *p == page && *a == addr {
                return *v;
            }
        }
        (page as u8).wrapping_add(addr)
    }

    fn reg_write(&mut self, page: u16, addr: u8, value: u8) -> u8 {
        let _ = self.reg_writes.push((page, addr, value));
        for slot in self.overrides.iter_mut() {
            if slot.0 == page && slot.1 == addr {
                slot.2 = value;
                return value;
            }
        }
        let _ = self.overrides.push((page, addr, value));
        value
    }

    fn execute_action(&mut self, action: u8, param: u8, _event: &RxEvent) {
        let _ = self.actions.push((action, param));
    }
}
