//! # VSCP Node Core
//!
//! The hard core of a VSCP Level 1 node: the lifecycle state machine, the
//! CLASS1.PROTOCOL event dispatcher, the register router and the timing
//! glue between them.
//!
//! ## Shape
//!
//! All mutable node state lives in one owning struct, [`Node`], generic
//! over the three platform seams from `vscp-hal` (transport, persistent
//! byte driver, application hooks). The platform drives it with exactly
//! two calls:
//!
//! - [`Node::process`] from the main loop. It drains at most one event,
//!   advances the state machine, emits due heartbeats and continues
//!   pending extended-page reads. Loop while it returns `true` for fast
//!   draining.
//! - [`Node::tick`] from the periodic tick source. It advances every
//!   timeout in the stack. The core never reads wall-clock time.
//!
//! ## Lifecycle
//!
//! `STARTUP → INIT → PREACTIVE → ACTIVE`, with `IDLE`, `RESET` and
//! `ERROR` as exits. INIT runs the nickname discovery protocol: probe the
//! segment master, wait for an assignment, or walk nicknames 1..=254
//! probing each until one stays silent.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod registers;
pub mod state;

mod dispatch;
mod node;
mod regio;

cfg_if::cfg_if! {
    if #[cfg(feature = "logger")] {
        pub mod logger;
    }
}

pub use config::CoreConfig;
pub use error::{CoreError, WriteError};
pub use node::Node;
pub use state::{InitState, NodeState};
