//! # Event Types
//!
//! Receive and transmit representations of a single VSCP Level 1 event.
//! Both carry the same fields; the distinction only exists so that the
//! direction of travel is visible in type signatures.

use heapless::Vec;

/// Maximum number of payload bytes in a Level 1 event.
pub const MAX_DATA_SIZE: usize = 8;

// =============================================================================
// PRIORITY
// =============================================================================

/// Wire priority of an event. Lower numeric value wins bus arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    /// Priority 0, highest.
    Highest = 0,
    /// Priority 1.
    High = 1,
    /// Priority 2.
    AboveNormal = 2,
    /// Priority 3.
    Normal = 3,
    /// Priority 4.
    BelowNormal = 4,
    /// Priority 5.
    Lower = 5,
    /// Priority 6.
    VeryLow = 6,
    /// Priority 7, lowest.
    Low = 7,
}

impl Priority {
    /// Build a priority from its wire value. Only the low three bits count.
    pub const fn from_wire(value: u8) -> Self {
        match value & 0x07 {
            0 => Priority::Highest,
            1 => Priority::High,
            2 => Priority::AboveNormal,
            3 => Priority::Normal,
            4 => Priority::BelowNormal,
            5 => Priority::Lower,
            6 => Priority::VeryLow,
            _ => Priority::Low,
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// A received event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxEvent {
    /// Event class (0 = CLASS1.PROTOCOL).
    pub class: u16,
    /// Class-local event type.
    pub event_type: u8,
    /// Wire priority.
    pub priority: Priority,
    /// Source nickname (0xFF = uninitialised, 0x00 = segment master).
    pub origin: u8,
    /// Source is a hard-coded (fixed-nickname) node.
    pub hard_coded: bool,
    /// Payload, 0..=8 bytes.
    pub data: Vec<u8, MAX_DATA_SIZE>,
}

/// An event to transmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEvent {
    /// Event class (0 = CLASS1.PROTOCOL).
    pub class: u16,
    /// Class-local event type.
    pub event_type: u8,
    /// Wire priority.
    pub priority: Priority,
    /// Own nickname at send time.
    pub origin: u8,
    /// This node is a hard-coded node.
    pub hard_coded: bool,
    /// Payload, 0..=8 bytes.
    pub data: Vec<u8, MAX_DATA_SIZE>,
}

impl TxEvent {
    /// Create an empty event with the given header fields.
    pub fn new(class: u16, event_type: u8, priority: Priority, origin: u8, hard_coded: bool) -> Self {
        Self {
            class,
            event_type,
            priority,
            origin,
            hard_coded,
            data: Vec::new(),
        }
    }

    /// Replace the payload. Bytes past [`MAX_DATA_SIZE`] are dropped.
    pub fn set_data(&mut self, bytes: &[u8]) {
        self.data.clear();
        let take = bytes.len().min(MAX_DATA_SIZE);
        // Cannot fail: `take` is bounded by the capacity.
        let _ = self.data.extend_from_slice(&bytes[..take]);
    }

    /// Append a single payload byte. Returns `false` when the payload is full.
    pub fn push_data(&mut self, byte: u8) -> bool {
        self.data.push(byte).is_ok()
    }
}

impl From<&TxEvent> for RxEvent {
    fn from(tx: &TxEvent) -> Self {
        Self {
            class: tx.class,
            event_type: tx.event_type,
            priority: tx.priority,
            origin: tx.origin,
            hard_coded: tx.hard_coded,
            data: tx.data.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
