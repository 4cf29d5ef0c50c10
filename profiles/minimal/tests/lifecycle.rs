//! Lifecycle scenarios: nickname drops, GUID-addressed resets, segment
//! heartbeats, the node heartbeat, epoch time keeping, boot-loader entry
//! and node identification.

mod common;

use common::{active_node, drain, drain_of, event, identity, protocol};
use vscp_core::NodeState;
use vscp_events::{class, types, ProtocolType};
use vscp_hal::LampState;

const NICK: u8 = 0x03;

// =============================================================================
// DROP NICKNAME
// =============================================================================

#[test]
fn drop_nickname_resets_immediately() {
    let mut node = active_node(NICK);

    node.bus_mut()
        .inject(protocol(ProtocolType::DropNickname, 0, &[NICK]));
    node.process();

    assert_eq!(node.state(), NodeState::Reset);
    assert_eq!(node.store_mut().read_nickname(), 0xFF);
    assert_eq!(node.app_mut().lamp, LampState::Off);

    // Zero wait time: the reset request fires on the next cycle, once.
    node.process();
    node.process();
    assert_eq!(node.app_mut().reset_requests, 1);
}

#[test]
fn drop_nickname_with_idle_flag_parks_the_node() {
    let mut node = active_node(NICK);

    node.bus_mut()
        .inject(protocol(ProtocolType::DropNickname, 0, &[NICK, 0x80]));
    node.process();

    assert_eq!(node.state(), NodeState::Idle);
    assert_eq!(node.store_mut().read_nickname(), 0xFF);
    assert_eq!(node.app_mut().reset_requests, 0);
}

#[test]
fn drop_nickname_with_defaults_and_keep_nickname() {
    let mut node = active_node(NICK);
    node.store_mut().write_user_id(0, 0x77);

    // Bit 6: restore defaults; bit 5: keep the nickname and reset after
    // the supplied wait time.
    node.bus_mut()
        .inject(protocol(ProtocolType::DropNickname, 0, &[NICK, 0x60, 2]));
    node.process();

    assert_eq!(node.state(), NodeState::Reset);
    assert_eq!(node.store_mut().read_nickname(), NICK);
    assert_eq!(node.store_mut().read_user_id(0), 0, "defaults restored");
    assert_eq!(node.app_mut().reset_requests, 0);

    // Two seconds tick down before the platform is asked to reset.
    node.tick(1000);
    node.process();
    assert_eq!(node.app_mut().reset_requests, 0);
    node.tick(1000);
    node.process();
    assert_eq!(node.app_mut().reset_requests, 1);
}

#[test]
fn drop_nickname_for_other_node_is_ignored() {
    let mut node = active_node(NICK);
    node.bus_mut()
        .inject(protocol(ProtocolType::DropNickname, 0, &[NICK + 1]));
    node.process();
    assert!(node.is_active());
}

// =============================================================================
// GUID RESET DEVICE
// =============================================================================

fn guid_frame(index: u8) -> [u8; 5] {
    let guid = identity().guid;
    let first = 15 - 4 * index;
    [
        index,
        guid[first as usize],
        guid[(first - 1) as usize],
        guid[(first - 2) as usize],
        guid[(first - 3) as usize],
    ]
}

#[test]
fn guid_reset_device_matches_four_frames() {
    let mut node = active_node(NICK);

    for index in 0..4 {
        node.bus_mut()
            .inject(protocol(ProtocolType::ResetDevice, 0, &guid_frame(index)));
        node.process();
    }

    assert_eq!(node.state(), NodeState::Reset);
    assert_eq!(node.store_mut().read_nickname(), 0xFF);
}

#[test]
fn guid_reset_device_requires_all_frames() {
    let mut node = active_node(NICK);

    for index in [0u8, 1, 3] {
        node.bus_mut()
            .inject(protocol(ProtocolType::ResetDevice, 0, &guid_frame(index)));
        node.process();
    }

    assert!(node.is_active());
}

#[test]
fn guid_reset_device_rejects_wrong_guid() {
    let mut node = active_node(NICK);

    for index in 0..4 {
        let mut frame = guid_frame(index);
        if index == 2 {
            frame[1] ^= 0xFF;
        }
        node.bus_mut()
            .inject(protocol(ProtocolType::ResetDevice, 0, &frame));
        node.process();
    }

    assert!(node.is_active());
}

#[test]
fn guid_reset_device_window_expires() {
    let mut node = active_node(NICK);

    for index in 0..2 {
        node.bus_mut()
            .inject(protocol(ProtocolType::ResetDevice, 0, &guid_frame(index)));
        node.process();
    }

    // The multi-message window runs out mid-sequence.
    node.tick(1001);

    for index in 2..4 {
        node.bus_mut()
            .inject(protocol(ProtocolType::ResetDevice, 0, &guid_frame(index)));
        node.process();
    }

    assert!(node.is_active());
}

// =============================================================================
// SEGMENT HEARTBEAT
// =============================================================================

#[test]
fn segment_heartbeat_updates_time() {
    let mut node = active_node(NICK);

    node.bus_mut().inject(protocol(
        ProtocolType::SegctrlHeartbeat,
        0,
        &[0x00, 0x12, 0x34, 0x56, 0x78],
    ));
    node.process();

    // CRC 0x00 matches the provisioned value: no re-initialisation, but
    // the timestamp is taken anyway.
    assert!(node.is_active());
    assert_eq!(node.time_since_epoch(), 0x12345678);
    assert_eq!(node.app_mut().epoch_updates, Some(0x12345678));
}

#[test]
fn segment_change_triggers_rediscovery() {
    let mut node = active_node(NICK);

    node.bus_mut()
        .inject(protocol(ProtocolType::SegctrlHeartbeat, 0, &[0x5A]));
    node.process();

    assert_eq!(node.state(), NodeState::Init);
    assert_eq!(node.store_mut().read_segment_crc(), 0x5A);
    assert_eq!(node.store_mut().read_nickname(), 0xFF);
}

// =============================================================================
// NODE HEARTBEAT AND EPOCH
// =============================================================================

#[test]
fn node_heartbeat_is_periodic() {
    let mut node = active_node(NICK);

    node.tick(1000);
    node.process();

    let frames: Vec<_> = drain(&mut node)
        .into_iter()
        .filter(|f| f.class == class::INFORMATION)
        .collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event_type, types::information::NODE_HEARTBEAT);
    // User byte, zone, sub-zone.
    assert_eq!(frames[0].data.as_slice(), &[0, 9, 4]);

    // Disabled: the next period stays silent.
    node.set_heartbeat_enabled(false);
    node.tick(1000);
    node.process();
    assert!(drain(&mut node)
        .iter()
        .all(|f| f.class != class::INFORMATION));
}

#[test]
fn epoch_counts_seconds_and_accepts_overrides() {
    let mut node = active_node(NICK);
    let base = node.time_since_epoch();

    node.tick(1000);
    node.process();
    assert_eq!(node.time_since_epoch(), base + 1);

    node.set_time_since_epoch(1_000_000);
    node.tick(1000);
    node.process();
    assert_eq!(node.time_since_epoch(), 1_000_001);
}

// =============================================================================
// BOOT LOADER
// =============================================================================

#[test]
fn boot_loader_entry_with_matching_credentials() {
    let mut node = active_node(NICK);
    node.app_mut().boot_algorithm = 0x01;

    // Algorithm, GUID bytes 15/12/10/8, current page select (0).
    node.bus_mut().inject(protocol(
        ProtocolType::EnterBootLoader,
        0,
        &[NICK, 0x01, 15, 12, 10, 8, 0x00, 0x00],
    ));
    node.process();

    assert_eq!(node.state(), NodeState::Idle);
    assert_eq!(node.app_mut().boot_requests, 1);
    assert_eq!(node.store_mut().read_boot_flag(), 0xBB);
    assert!(drain_of(&mut node, ProtocolType::NackBootLoader).is_empty());
}

#[test]
fn boot_loader_entry_rejects_wrong_guid() {
    let mut node = active_node(NICK);
    node.app_mut().boot_algorithm = 0x01;

    node.bus_mut().inject(protocol(
        ProtocolType::EnterBootLoader,
        0,
        &[NICK, 0x01, 15, 12, 10, 99, 0x00, 0x00],
    ));
    node.process();

    assert!(node.is_active());
    assert_eq!(node.app_mut().boot_requests, 0);
    let nacks = drain_of(&mut node, ProtocolType::NackBootLoader);
    assert_eq!(nacks.len(), 1);
    assert_eq!(nacks[0].data.as_slice(), &[0]);
}

#[test]
fn boot_loader_entry_without_boot_loader_is_refused() {
    let mut node = active_node(NICK);
    // boot_algorithm stays 0xFF: no boot loader on this board.

    node.bus_mut().inject(protocol(
        ProtocolType::EnterBootLoader,
        0,
        &[NICK, 0x01, 15, 12, 10, 8, 0x00, 0x00],
    ));
    node.process();

    assert!(node.is_active());
    assert_eq!(drain_of(&mut node, ProtocolType::NackBootLoader).len(), 1);
}

// =============================================================================
// WHO IS THERE
// =============================================================================

#[test]
fn who_is_there_reports_guid_and_mdf() {
    let mut node = active_node(NICK);

    node.bus_mut()
        .inject(protocol(ProtocolType::WhoIsThere, 0, &[NICK]));
    node.process();

    let frames = drain_of(&mut node, ProtocolType::WhoIsThereResponse);
    assert_eq!(frames.len(), 8);

    // Reassemble the row-indexed payload.
    let mut payload = Vec::new();
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.data[0], index as u8, "row index");
        assert_eq!(frame.data.len(), 8);
        payload.extend_from_slice(&frame.data[1..]);
    }

    let id = identity();
    // GUID arrives MSB first.
    let wire_guid: Vec<u8> = id.guid.iter().rev().copied().collect();
    assert_eq!(&payload[..16], wire_guid.as_slice());
    assert_eq!(&payload[16..48], &id.mdf_url);
    // The final frame is padded with zeros.
    assert!(payload[48..].iter().all(|b| *b == 0));
}

#[test]
fn who_is_there_answers_broadcast() {
    let mut node = active_node(NICK);
    node.bus_mut()
        .inject(protocol(ProtocolType::WhoIsThere, 0, &[0xFF]));
    node.process();
    assert_eq!(drain_of(&mut node, ProtocolType::WhoIsThereResponse).len(), 8);
}

// =============================================================================
// BUS LOGGER
// =============================================================================

#[test]
fn bus_logger_toggles_via_log_events() {
    let mut node = active_node(NICK);

    // Off by default: nothing goes out.
    assert!(!node.is_logging());
    assert!(!node.log_event(vscp_core::logger::level::INFO, 7));

    // Log Start addressed to stream 0 switches emission on.
    node.bus_mut()
        .inject(event(class::LOG, types::log::START, 0, &[0]));
    node.process();
    assert!(node.is_logging());

    assert!(node.log_event(vscp_core::logger::level::INFO, 0x0102_0304));
    let frames: Vec<_> = drain(&mut node)
        .into_iter()
        .filter(|f| f.class == class::LOG)
        .collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event_type, types::log::MESSAGE);
    // Stream id, level, value big-endian.
    assert_eq!(frames[0].data.as_slice(), &[0, 1, 1, 2, 3, 4]);

    node.bus_mut()
        .inject(event(class::LOG, types::log::STOP, 0, &[0]));
    node.process();
    assert!(!node.is_logging());
}

// =============================================================================
// EVENT DELIVERY
// =============================================================================

#[test]
fn non_protocol_events_reach_the_application() {
    let mut node = active_node(NICK);

    node.bus_mut()
        .inject(event(class::INFORMATION, 3, 0x22, &[0, 1, 2]));
    node.process();

    assert_eq!(node.app_mut().delivered, 1);
}

#[test]
fn new_node_online_for_own_nickname_is_defended() {
    let mut node = active_node(NICK);

    node.bus_mut()
        .inject(protocol(ProtocolType::NewNodeOnline, 0xFF, &[NICK]));
    node.process();

    let acks = drain_of(&mut node, ProtocolType::ProbeAck);
    assert_eq!(acks.len(), 1);
    assert!(acks[0].data.is_empty());
}

#[test]
fn probe_ack_collision_restarts_discovery() {
    let mut node = active_node(NICK);

    node.bus_mut().inject(protocol(ProtocolType::ProbeAck, NICK, &[]));
    node.process();

    assert_eq!(node.state(), NodeState::Init);
    assert_eq!(node.store_mut().read_nickname(), 0xFF);
}
