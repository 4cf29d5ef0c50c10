//! # VSCP Event Model
//!
//! Shared event types and wire constants for the VSCP Level 1 node
//! framework. This crate is the vocabulary every other framework crate
//! speaks:
//!
//! - [`RxEvent`] / [`TxEvent`]: one event on the bus, with class, type,
//!   priority, origin nickname, hard-coded flag and up to 8 data bytes.
//! - [`ProtocolType`]: the CLASS1.PROTOCOL type codes as a sum type.
//! - [`class`] / [`types`]: the class and class-local type constants the
//!   core actually dispatches on.
//! - [`zone`]: the per-class location of the zone byte in an event payload.
//! - [`ring`]: a fixed-capacity cyclic buffer used for the loopback cache.
//!
//! The crate is `no_std` and allocation-free; payloads are bounded
//! `heapless` vectors.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod class;
pub mod event;
pub mod protocol;
pub mod ring;
pub mod types;
pub mod zone;

pub use event::{Priority, RxEvent, TxEvent, MAX_DATA_SIZE};
pub use protocol::ProtocolType;

/// Nickname of the segment master.
pub const NICKNAME_SEGMENT_MASTER: u8 = 0x00;

/// Nickname value meaning "not assigned yet".
pub const NICKNAME_NOT_INIT: u8 = 0xFF;

/// Size of a node GUID in bytes.
pub const GUID_SIZE: usize = 16;
