//! # Minimal Node Profile
//!
//! A reference wiring of the framework against a simulated board: queue
//! transport, RAM-backed persistence and a recording application. Products
//! copy this shape and swap the board for real drivers; the integration
//! tests drive full protocol scenarios through it.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod board;

pub use board::{NodeNvm, SimApp, SimBus, SimNode};

use vscp_core::{CoreConfig, Node};
use vscp_hal::ArrayNvm;
use vscp_storage::NodeIdentity;

/// Assemble a simulated node from an identity and configuration. The
/// persistent region starts erased (all 0xFF), so the first `init` runs a
/// factory reset.
pub fn build_node(identity: NodeIdentity, config: CoreConfig) -> SimNode {
    Node::new(
        SimBus::new(),
        ArrayNvm::new(),
        SimApp::new(),
        identity,
        config,
    )
}
