//! Shared helpers for the protocol scenario tests.
#![allow(dead_code)]

use heapless::Vec;
use vscp_core::CoreConfig;
use vscp_events::{class, Priority, ProtocolType, RxEvent, TxEvent};
use vscp_node_minimal::{build_node, SimNode};
use vscp_storage::NodeIdentity;

/// Identity used by every scenario: GUID byte `i` equals `i` (LSB-first
/// storage order), zone 9 / sub-zone 4.
pub fn identity() -> NodeIdentity {
    let mut id = NodeIdentity::zeroed();
    for (index, byte) in id.guid.iter_mut().enumerate() {
        *byte = index as u8;
    }
    id.zone = 9;
    id.sub_zone = 4;
    id.manufacturer_dev_id = [0x11, 0x22, 0x33, 0x44];
    id.manufacturer_sub_dev_id = [0x55, 0x66, 0x77, 0x88];
    id.firmware_version = (1, 2, 3);
    id.family_code = [1, 2, 3, 4];
    id.device_type = [5, 6, 7, 8];
    id.set_mdf_url("example.com/mdf/minimal.xml");
    id
}

/// A node over erased persistence, not yet initialised.
pub fn fresh_node() -> SimNode {
    build_node(identity(), CoreConfig::default())
}

/// Provision persistence for auto-init discovery (start-up control 01b,
/// no nickname) and clear the matrix regions.
pub fn auto_node() -> SimNode {
    let mut node = fresh_node();
    provision(&mut node, 0xFF);
    node
}

/// A node already ACTIVE with `nickname`, announce frame drained.
pub fn active_node(nickname: u8) -> SimNode {
    let mut node = fresh_node();
    provision(&mut node, nickname);
    node.init().expect("init");
    node.process();
    assert!(node.is_active());
    let announce = node.bus_mut().take_sent().expect("announce");
    assert_eq!(
        ProtocolType::from(announce.event_type),
        ProtocolType::NewNodeOnline
    );
    node
}

fn provision(node: &mut SimNode, nickname: u8) {
    let store = node.store_mut();
    store.write_node_control_flags(0x40); // auto-init, writes protected
    store.write_nickname(nickname);
    store.write_segment_crc(0x00);
    store.write_log_stream_id(0);
    store.clear_user_id();
    store.clear_dm();
    store.clear_dm_ext();
    store.clear_dm_ng();
}

/// Build a CLASS1.PROTOCOL event.
pub fn protocol(ty: ProtocolType, origin: u8, data: &[u8]) -> RxEvent {
    event(class::PROTOCOL, ty.code(), origin, data)
}

/// Build an arbitrary event.
pub fn event(class: u16, event_type: u8, origin: u8, data: &[u8]) -> RxEvent {
    RxEvent {
        class,
        event_type,
        priority: Priority::Normal,
        origin,
        hard_coded: false,
        data: Vec::from_slice(data).expect("payload fits"),
    }
}

/// Drain every sent frame.
pub fn drain(node: &mut SimNode) -> std::vec::Vec<TxEvent> {
    let mut frames = std::vec::Vec::new();
    while let Some(frame) = node.bus_mut().take_sent() {
        frames.push(frame);
    }
    frames
}

/// Drain sent frames, keeping only the given protocol type.
pub fn drain_of(node: &mut SimNode, ty: ProtocolType) -> std::vec::Vec<TxEvent> {
    drain(node)
        .into_iter()
        .filter(|f| f.class == class::PROTOCOL && ProtocolType::from(f.event_type) == ty)
        .collect()
}
