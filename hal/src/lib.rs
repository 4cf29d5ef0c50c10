//! # VSCP Hardware Abstraction Layer
//!
//! The three seams between the protocol core and the platform it runs on:
//!
//! - [`Transport`]: non-blocking read/write of single event frames,
//!   typically backed by a CAN controller.
//! - [`NvMemory`]: a byte-granular driver over the persistent region
//!   (EEPROM, flash emulation, battery-backed RAM).
//! - [`Application`]: everything the node delegates upward: status lamp,
//!   reset and boot-loader requests, application registers, decision-matrix
//!   actions and event callouts.
//!
//! The core is generic over these traits and never touches hardware or
//! wall-clock time itself. [`ArrayNvm`] is a RAM-backed `NvMemory` for
//! tests and for platforms that shadow their EEPROM in RAM.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod nvm;
mod transport;

pub use app::{Application, LampState};
pub use nvm::{ArrayNvm, NvMemory};
pub use transport::Transport;
