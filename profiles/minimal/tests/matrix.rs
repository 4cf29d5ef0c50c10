//! Decision matrix scenarios driven over the bus: standard rows,
//! extension rows with zone overrides and payload matching, and DM-NG
//! rules.

mod common;

use common::{active_node, event};
use vscp_events::class;
use vscp_matrix::{ExtMatchFlags, ExtRow, MatrixRow, RowFlags, ACTION_EXTENDED};
use vscp_node_minimal::SimNode;

const NICK: u8 = 0x03;

fn put_row(node: &mut SimNode, index: u8, row: MatrixRow) {
    let start = index as u16 * 8;
    for (offset, byte) in row.to_bytes().iter().enumerate() {
        node.store_mut().write_dm(start + offset as u16, *byte);
    }
}

fn put_ext_row(node: &mut SimNode, index: u8, row: ExtRow) {
    let start = index as u16 * 8;
    for (offset, byte) in row.to_bytes().iter().enumerate() {
        node.store_mut().write_dm_ext(start + offset as u16, *byte);
    }
}

#[test]
fn standard_row_fires_action() {
    let mut node = active_node(NICK);
    put_row(
        &mut node,
        0,
        MatrixRow {
            flags: RowFlags::ENABLE.bits(),
            class_mask: 0xFF,
            class_filter: 30, // CLASS1.CONTROL
            type_mask: 0xFF,
            type_filter: 5,
            action: 0x21,
            action_param: 0x42,
            ..Default::default()
        },
    );

    node.bus_mut().inject(event(class::CONTROL, 5, 0x22, &[0, 9, 4]));
    node.process();

    assert_eq!(node.app_mut().actions.as_slice(), &[(0x21, 0x42)]);
}

#[test]
fn disabled_row_never_fires() {
    let mut node = active_node(NICK);
    put_row(
        &mut node,
        0,
        MatrixRow {
            flags: 0,
            class_mask: 0xFF,
            class_filter: 30,
            type_mask: 0xFF,
            type_filter: 5,
            action: 0x21,
            ..Default::default()
        },
    );

    node.bus_mut().inject(event(class::CONTROL, 5, 0x22, &[0, 9, 4]));
    node.process();

    assert!(node.app_mut().actions.is_empty());
}

#[test]
fn extension_row_matches_zone_and_payload() {
    let mut node = active_node(NICK);

    // Standard row: CLASS1.MEASUREZONE type 6, zone and sub-zone must
    // match, action routed to the extension with par0 comparison.
    put_row(
        &mut node,
        0,
        MatrixRow {
            flags: (RowFlags::ENABLE | RowFlags::MATCH_ZONE | RowFlags::MATCH_SUB_ZONE).bits(),
            class_mask: 0xFF,
            class_filter: 65,
            type_mask: 0xFF,
            type_filter: 6,
            action: ACTION_EXTENDED,
            action_param: ExtMatchFlags::PAR_0.bits(),
            ..Default::default()
        },
    );
    put_ext_row(
        &mut node,
        0,
        ExtRow {
            zone: 9,
            sub_zone: 4,
            par0: 0x42,
            action: 0x10,
            action_param: 0x99,
            ..Default::default()
        },
    );

    // Zone byte sits at payload index 1 for MEASUREZONE events.
    node.bus_mut()
        .inject(event(class::MEASUREZONE, 6, 0x22, &[0x42, 9, 4]));
    node.process();
    assert_eq!(node.app_mut().actions.as_slice(), &[(0x10, 0x99)]);

    // Wrong payload byte 0: no action.
    node.bus_mut()
        .inject(event(class::MEASUREZONE, 6, 0x22, &[0x41, 9, 4]));
    node.process();
    assert_eq!(node.app_mut().actions.len(), 1);

    // Wrong zone: no action.
    node.bus_mut()
        .inject(event(class::MEASUREZONE, 6, 0x22, &[0x42, 8, 4]));
    node.process();
    assert_eq!(node.app_mut().actions.len(), 1);
}

#[test]
fn matrix_also_sees_protocol_events() {
    let mut node = active_node(NICK);
    put_row(
        &mut node,
        0,
        MatrixRow {
            flags: RowFlags::ENABLE.bits(),
            class_mask: 0xFF,
            class_filter: 0, // CLASS1.PROTOCOL
            type_mask: 0xFF,
            type_filter: 2, // new node online
            action: 0x33,
            ..Default::default()
        },
    );

    node.bus_mut()
        .inject(common::protocol(vscp_events::ProtocolType::NewNodeOnline, 0x22, &[0x22]));
    node.process();

    assert_eq!(node.app_mut().actions.as_slice(), &[(0x33, 0x00)]);
}

#[test]
fn ng_rule_fires_on_combined_conditions() {
    let mut node = active_node(NICK);

    // One rule: type == 6 AND data[0] > 3.
    let rules = [
        1u8, // rule count
        9,    // rule size
        0x11, // action id
        0x02, // action parameter
        0x11, 2, 6, // AND + EQ on type
        0x03, 9, 3, // LAST + GT on data[0]
    ];
    for (index, byte) in rules.iter().enumerate() {
        node.store_mut().write_dm_ng(index as u16, *byte);
    }

    node.bus_mut().inject(event(class::INFORMATION, 6, 0x22, &[9]));
    node.process();
    assert_eq!(node.app_mut().actions.as_slice(), &[(0x11, 0x02)]);

    // data[0] too small: nothing fires.
    node.bus_mut().inject(event(class::INFORMATION, 6, 0x22, &[2]));
    node.process();
    assert_eq!(node.app_mut().actions.len(), 1);
}

#[test]
fn matrix_registers_visible_through_page_one() {
    let mut node = active_node(NICK);
    put_row(
        &mut node,
        0,
        MatrixRow {
            origin: 0x55,
            flags: RowFlags::ENABLE.bits(),
            ..Default::default()
        },
    );

    // Read the first matrix byte through the register interface.
    node.bus_mut().inject(common::protocol(
        vscp_events::ProtocolType::ExtendedPageRead,
        0,
        &[NICK, 0x00, 0x01, 0x00, 2],
    ));
    node.process();

    let frames = common::drain_of(&mut node, vscp_events::ProtocolType::ExtendedPageResponse);
    assert_eq!(frames.len(), 1);
    assert_eq!(
        frames[0].data.as_slice(),
        &[0, 0x00, 0x01, 0x00, 0x55, RowFlags::ENABLE.bits()]
    );
}
