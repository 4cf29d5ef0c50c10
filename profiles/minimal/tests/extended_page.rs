//! Extended page read/write scenarios: 16-bit pages, paced multi-frame
//! responses, page-boundary crossings and the count-0 full read.
//!
//! The cycle that accepts a read request produces up to two frames: one
//! from the handler itself and one from the end-of-cycle continuation.
//! Every later cycle adds at most one frame.

mod common;

use common::{active_node, drain_of, protocol};
use vscp_events::ProtocolType;

const NICK: u8 = 0x03;

#[test]
fn read_crosses_page_boundary() {
    let mut node = active_node(NICK);

    // Four registers starting at (0x0005, 0xFE): two on page 5, two on
    // page 6. The page field of each frame names where its bytes live,
    // so the read switches to a fresh frame at the boundary.
    node.bus_mut().inject(protocol(
        ProtocolType::ExtendedPageRead,
        0,
        &[NICK, 0x00, 0x05, 0xFE, 4],
    ));
    node.process();

    let frames = drain_of(&mut node, ProtocolType::ExtendedPageResponse);
    assert_eq!(frames.len(), 2);
    assert_eq!(
        frames[0].data.as_slice(),
        &[0, 0x00, 0x05, 0xFE, 5u8.wrapping_add(0xFE), 5u8.wrapping_add(0xFF)]
    );
    assert_eq!(frames[1].data.as_slice(), &[1, 0x00, 0x06, 0x00, 6, 7]);

    // Nothing left afterwards.
    node.process();
    assert!(drain_of(&mut node, ProtocolType::ExtendedPageResponse).is_empty());
}

#[test]
fn count_zero_reads_full_page() {
    let mut node = active_node(NICK);

    node.bus_mut().inject(protocol(
        ProtocolType::ExtendedPageRead,
        0,
        &[NICK, 0x00, 0x05, 0x00, 0],
    ));
    node.process();

    let mut frames = drain_of(&mut node, ProtocolType::ExtendedPageResponse);
    // Four registers per frame: 64 frames for the full page, paced one
    // per cycle after the first.
    for _ in 0..80 {
        node.process();
        frames.extend(drain_of(&mut node, ProtocolType::ExtendedPageResponse));
    }

    assert_eq!(frames.len(), 64);
    let mut total = 0usize;
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.data[0], index as u8, "sequence number");
        assert_eq!(frame.data[1], 0x00);
        assert_eq!(frame.data[2], 0x05, "every byte lives on page 5");
        total += frame.data.len() - 4;
    }
    assert_eq!(total, 256);
}

#[test]
fn short_request_reads_one_register() {
    let mut node = active_node(NICK);

    node.bus_mut().inject(protocol(
        ProtocolType::ExtendedPageRead,
        0,
        &[NICK, 0x00, 0x05, 0x10],
    ));
    node.process();

    let frames = drain_of(&mut node, ProtocolType::ExtendedPageResponse);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data.as_slice(), &[0, 0x00, 0x05, 0x10, 0x15]);
}

#[test]
fn write_responds_with_stored_values() {
    let mut node = active_node(NICK);

    // Unprotect application registers first.
    node.bus_mut()
        .inject(protocol(ProtocolType::WriteRegister, 0, &[NICK, 0x83, 0x60]));
    node.process();
    drain_of(&mut node, ProtocolType::RwResponse);

    node.bus_mut().inject(protocol(
        ProtocolType::ExtendedPageWrite,
        0,
        &[NICK, 0x00, 0x05, 0x20, 0xDE, 0xAD],
    ));
    node.process();

    let frames = drain_of(&mut node, ProtocolType::ExtendedPageResponse);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data.as_slice(), &[0, 0x00, 0x05, 0x20, 0xDE, 0xAD]);
    assert_eq!(
        node.app_mut().reg_writes.as_slice(),
        &[(5, 0x20, 0xDE), (5, 0x21, 0xAD)]
    );
}

#[test]
fn congested_bus_retries_the_same_frame() {
    let mut node = active_node(NICK);

    node.bus_mut().inject(protocol(
        ProtocolType::ExtendedPageRead,
        0,
        &[NICK, 0x00, 0x05, 0x00, 12],
    ));
    node.process();
    let frames = drain_of(&mut node, ProtocolType::ExtendedPageResponse);
    assert_eq!(frames.len(), 2);

    // The transport rejects the next frame; the continuation must not
    // lose it.
    node.bus_mut().reject_writes = true;
    node.process();
    node.bus_mut().reject_writes = false;
    node.process();

    let frames = drain_of(&mut node, ProtocolType::ExtendedPageResponse);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].data[0], 2, "sequence is not skipped");
    assert_eq!(frames[0].data[3], 0x08, "address resumes where it paused");
}
