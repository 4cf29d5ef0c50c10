//! # Protocol Dispatcher
//!
//! Handling of every CLASS1.PROTOCOL event a node must answer. All
//! handlers validate the payload length before touching it; malformed
//! events are dropped without a reply. Types that only matter to
//! management hosts or to the boot loader itself are ignored.

use log::{debug, info};
use vscp_events::{class, Priority, ProtocolType, RxEvent};
use vscp_events::{NICKNAME_NOT_INIT, NICKNAME_SEGMENT_MASTER};
use vscp_hal::{Application, NvMemory, Transport};
use vscp_storage::BOOT_FLAG_BOOTLOADER;

use crate::node::{ExtPageRead, Node};
use crate::state::NodeState;

impl<T, N, A> Node<T, N, A>
where
    T: Transport,
    N: NvMemory,
    A: Application,
{
    /// Dispatch one PROTOCOL-class event received in ACTIVE.
    pub(crate) fn dispatch_protocol(&mut self, event: &RxEvent) {
        match ProtocolType::from(event.event_type) {
            ProtocolType::SegctrlHeartbeat => {
                if cfg!(feature = "segment-heartbeat") {
                    self.handle_segctrl_heartbeat(event);
                }
            }
            ProtocolType::NewNodeOnline => self.handle_new_node_online(event),
            ProtocolType::ProbeAck => self.handle_probe_ack(event),
            ProtocolType::SetNickname => self.handle_set_nickname(event),
            ProtocolType::DropNickname => self.handle_drop_nickname(event),
            ProtocolType::ReadRegister => self.handle_read_register(event),
            ProtocolType::WriteRegister => self.handle_write_register(event),
            ProtocolType::EnterBootLoader => self.handle_enter_boot_loader(event),
            ProtocolType::ResetDevice => self.handle_guid_drop(event),
            ProtocolType::PageRead => self.handle_page_read(event),
            ProtocolType::PageWrite => self.handle_page_write(event),
            ProtocolType::IncrementRegister => self.handle_increment_register(event),
            ProtocolType::DecrementRegister => self.handle_decrement_register(event),
            ProtocolType::WhoIsThere => self.handle_who_is_there(event),
            ProtocolType::GetMatrixInfo => self.handle_get_matrix_info(event),
            ProtocolType::ExtendedPageRead => self.handle_extended_page_read(event),
            ProtocolType::ExtendedPageWrite => self.handle_extended_page_write(event),

            // Responses and acknowledges are management-host material.
            ProtocolType::Undefined
            | ProtocolType::NicknameAccepted
            | ProtocolType::RwResponse
            | ProtocolType::RwPageResponse
            | ProtocolType::WhoIsThereResponse
            | ProtocolType::GetMatrixInfoResponse
            | ProtocolType::ExtendedPageResponse => {}

            // Boot-loader block traffic is answered by the boot loader,
            // not by the application firmware.
            ProtocolType::AckBootLoader
            | ProtocolType::NackBootLoader
            | ProtocolType::StartBlock
            | ProtocolType::StartBlockAck
            | ProtocolType::StartBlockNack
            | ProtocolType::BlockData
            | ProtocolType::BlockDataAck
            | ProtocolType::BlockDataNack
            | ProtocolType::ProgramBlockData
            | ProtocolType::ProgramBlockDataAck
            | ProtocolType::ProgramBlockDataNack
            | ProtocolType::ActivateNewImage
            | ProtocolType::ActivateNewImageAck
            | ProtocolType::ActivateNewImageNack => {}

            // Optional services this node does not provide.
            ProtocolType::HighEndServerProbe
            | ProtocolType::HighEndServerResponse
            | ProtocolType::GetEmbeddedMdf
            | ProtocolType::GetEmbeddedMdfResponse
            | ProtocolType::GetEventInterest
            | ProtocolType::GetEventInterestResponse => {}

            ProtocolType::Unknown(_) => {}
        }
    }

    // -------------------------------------------------------------------------
    // Segment management
    // -------------------------------------------------------------------------

    fn handle_segctrl_heartbeat(&mut self, event: &RxEvent) {
        if event.data.is_empty() {
            return;
        }

        let crc = event.data[0];
        if self.store.read_segment_crc() != crc {
            // A different segment CRC means the node moved to another
            // segment and needs a nickname valid there.
            info!("segment changed, crc {:#04x}", crc);
            self.store.write_segment_crc(crc);

            // Unless the master probe just ran; then discovery is fresh.
            if self.probe_nickname != NICKNAME_SEGMENT_MASTER {
                self.change_to_init(true);
            }
        }

        if event.data.len() >= 5 {
            let timestamp = u32::from_be_bytes([
                event.data[1],
                event.data[2],
                event.data[3],
                event.data[4],
            ]);
            self.time_since_epoch = timestamp;
            self.app.update_time_since_epoch(timestamp);
        }
    }

    fn handle_new_node_online(&mut self, event: &RxEvent) {
        if event.data.len() != 1 {
            return;
        }

        if event.data[0] == self.nickname {
            // Someone probes our nickname: defend it.
            let tx = self.prepare_tx(
                class::PROTOCOL,
                ProtocolType::ProbeAck.code(),
                Priority::Highest,
            );
            let _ = self.send_event(&tx);
        }
    }

    fn handle_probe_ack(&mut self, event: &RxEvent) {
        if !event.data.is_empty() {
            return;
        }

        if event.origin == self.nickname {
            // A node with our own nickname answered: collision. Give the
            // nickname up and rediscover.
            info!("nickname collision on {:#04x}", self.nickname);
            self.change_to_init(true);
        }
    }

    fn handle_set_nickname(&mut self, event: &RxEvent) {
        if event.data.len() != 2 {
            return;
        }

        if event.data[0] == self.nickname && event.data[1] != NICKNAME_SEGMENT_MASTER {
            self.write_nickname(event.data[1]);

            let tx = self.prepare_tx(
                class::PROTOCOL,
                ProtocolType::NicknameAccepted.code(),
                Priority::Low,
            );
            let _ = self.send_event(&tx);
        }
    }

    fn handle_drop_nickname(&mut self, event: &RxEvent) {
        if event.data.is_empty() || event.data[0] != self.nickname {
            return;
        }

        match event.data.len() {
            1 => {
                self.write_nickname(NICKNAME_NOT_INIT);
                self.change_to_reset(0);
            }
            2 | 3 => {
                let flags = event.data[1];
                let wait_s = event.data.get(2).copied().unwrap_or(0);

                // Bit 6: restore persistent defaults first.
                if flags & (1 << 6) != 0 {
                    let nickname_backup = self.nickname;
                    self.restore_factory_defaults();

                    // Bit 5 keeps the nickname across the reset.
                    if flags & (1 << 5) != 0 {
                        self.write_nickname(nickname_backup);
                    }
                }

                if flags & (1 << 5) != 0 {
                    // Reset, nickname kept. Takes precedence over idle.
                    self.change_to_reset(wait_s);
                } else if flags & (1 << 7) != 0 {
                    self.write_nickname(NICKNAME_NOT_INIT);
                    self.change_to_idle();
                } else {
                    self.write_nickname(NICKNAME_NOT_INIT);
                    self.change_to_reset(wait_s);
                }
            }
            _ => {}
        }
    }

    /// GUID drop nickname / reset device: four frames, each carrying four
    /// GUID bytes, all inside one multi-message window.
    pub(crate) fn handle_guid_drop(&mut self, event: &RxEvent) {
        if event.data.len() != 5 || event.data[0] >= 4 {
            return;
        }

        let frame = event.data[0];

        if frame == 0 {
            self.guid_drop_progress = 0;
            self.timer_start(self.timer_guid_drop, self.config.multi_msg_timeout_ms);
        }

        if !self.timer_running(self.timer_guid_drop) {
            // Window expired; the partial match is void.
            self.guid_drop_progress = 0;
            return;
        }

        let mut matches = true;
        for index in 0..4u8 {
            let guid_index = 15 - 4 * frame - index;
            if event.data[1 + index as usize] != self.guid_byte(guid_index) {
                matches = false;
                break;
            }
        }

        if matches {
            self.guid_drop_progress |= 1 << frame;
        }

        if frame == 3 && self.guid_drop_progress == 0x0F {
            self.timer_stop(self.timer_guid_drop);
            self.guid_drop_progress = 0;

            if cfg!(feature = "silent-node") && self.state == NodeState::Startup {
                // A silent node answers a full GUID match by starting
                // discovery instead of resetting.
                self.start_node_segment_init();
            } else {
                debug!("guid match complete, dropping nickname");
                self.write_nickname(NICKNAME_NOT_INIT);
                self.change_to_reset(0);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Register access
    // -------------------------------------------------------------------------

    pub(crate) fn send_rw_response(&mut self, addr: u8, value: u8) {
        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::RwResponse.code(),
            Priority::Normal,
        );
        tx.set_data(&[addr, value]);
        let _ = self.send_event(&tx);
    }

    fn handle_read_register(&mut self, event: &RxEvent) {
        if event.data.len() != 2 || event.data[0] != self.nickname {
            return;
        }

        let addr = event.data[1];
        let value = self.read_register(0, addr);
        self.send_rw_response(addr, value);
    }

    fn handle_write_register(&mut self, event: &RxEvent) {
        if event.data.len() != 3 || event.data[0] != self.nickname {
            return;
        }

        let addr = event.data[1];
        if let Ok(value) = self.write_register(0, addr, event.data[2]) {
            self.send_rw_response(addr, value);
        }
        // Rejected writes stay unanswered.
    }

    fn handle_increment_register(&mut self, event: &RxEvent) {
        if event.data.len() != 2 || event.data[0] != self.nickname {
            return;
        }

        let addr = event.data[1];
        let value = self.read_register(0, addr).wrapping_add(1);
        if let Ok(stored) = self.write_register(0, addr, value) {
            self.send_rw_response(addr, stored);
        }
    }

    fn handle_decrement_register(&mut self, event: &RxEvent) {
        if event.data.len() != 2 || event.data[0] != self.nickname {
            return;
        }

        let addr = event.data[1];
        let value = self.read_register(0, addr).wrapping_sub(1);
        if let Ok(stored) = self.write_register(0, addr, value) {
            self.send_rw_response(addr, stored);
        }
    }

    fn handle_page_read(&mut self, event: &RxEvent) {
        if event.data.len() != 3 || event.data[0] != self.nickname {
            return;
        }

        let addr = event.data[1] as u16;
        let mut count = event.data[2] as u16;

        // Clip at the page end instead of wrapping.
        if 0xFF - count < addr {
            count = 0xFF - addr;
        }

        let page = self.page_select;
        let mut seq: u8 = 0;
        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::RwPageResponse.code(),
            Priority::Normal,
        );
        tx.push_data(seq);

        for index in 0..count {
            let value = self.read_register(page, (addr + index) as u8);
            tx.push_data(value);

            if tx.data.len() == 8 {
                let _ = self.send_event(&tx);
                seq = seq.wrapping_add(1);
                tx.data.clear();
                tx.push_data(seq);
            }
        }

        if tx.data.len() > 1 {
            let _ = self.send_event(&tx);
        }
    }

    fn handle_page_write(&mut self, event: &RxEvent) {
        if event.data.len() < 3 || event.data[0] != self.nickname {
            return;
        }

        let addr = event.data[1] as u16;
        let mut count = (event.data.len() - 2) as u16;

        if 0xFF - count < addr {
            count = 0xFF - addr;
        }

        let page = self.page_select;
        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::RwPageResponse.code(),
            Priority::Normal,
        );
        tx.push_data(0); // Single-frame response, sequence 0.

        for index in 0..count {
            let value = event.data[2 + index as usize];
            let stored = self
                .write_register(page, (addr + index) as u8, value)
                .unwrap_or(0);
            tx.push_data(stored);
        }

        let _ = self.send_event(&tx);
    }

    fn handle_extended_page_read(&mut self, event: &RxEvent) {
        if event.data.len() < 4 || event.data[0] != self.nickname {
            return;
        }

        let page = u16::from_be_bytes([event.data[1], event.data[2]]);
        let addr = event.data[3];
        let count = match event.data.get(4) {
            // Count 0 requests a full page of 256 registers.
            Some(0) => 256,
            Some(&n) => n as u16,
            None => 1,
        };

        self.ext_page_read = Some(ExtPageRead {
            page,
            addr,
            count,
            seq: 0,
        });

        // One response now; the rest is paced over later process cycles
        // so a long read cannot starve the application.
        self.continue_extended_page_read();
    }

    fn handle_extended_page_write(&mut self, event: &RxEvent) {
        if event.data.len() < 5 || event.data[0] != self.nickname {
            return;
        }

        let page = u16::from_be_bytes([event.data[1], event.data[2]]);
        let addr = event.data[3] as u16;
        let mut count = (event.data.len() - 4) as u16;

        if (0xFF - count) + 1 < addr {
            count = (0xFF - addr) + 1;
        }

        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::ExtendedPageResponse.code(),
            Priority::Normal,
        );
        tx.set_data(&[0, event.data[1], event.data[2], event.data[3]]);

        for index in 0..count {
            let value = event.data[4 + index as usize];
            let stored = self
                .write_register(page, (addr + index) as u8, value)
                .unwrap_or(0);
            tx.push_data(stored);
        }

        let _ = self.send_event(&tx);
    }

    // -------------------------------------------------------------------------
    // Node information
    // -------------------------------------------------------------------------

    fn handle_who_is_there(&mut self, event: &RxEvent) {
        if event.data.len() != 1 {
            return;
        }

        if event.data[0] != self.nickname && event.data[0] != NICKNAME_NOT_INIT {
            return;
        }

        // Row-indexed response: GUID (wire order, MSB first) followed by
        // the MDF URL, seven payload bytes per row, zero padded.
        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::WhoIsThereResponse.code(),
            Priority::Normal,
        );
        let mut row: u8 = 0;
        tx.push_data(row);
        row += 1;

        for guid_index in (0u8..16).rev() {
            let byte = self.guid_byte(guid_index);
            tx.push_data(byte);
            if tx.data.len() == 8 {
                let _ = self.send_event(&tx);
                tx.data.clear();
                tx.push_data(row);
                row += 1;
            }
        }

        for url_index in 0u8..32 {
            let byte = {
                let Self { device, store, .. } = self;
                device.mdf_url(store, url_index)
            };
            tx.push_data(byte);
            if tx.data.len() == 8 {
                let _ = self.send_event(&tx);
                tx.data.clear();
                tx.push_data(row);
                row += 1;
            }
        }

        while tx.data.len() < 8 {
            tx.push_data(0);
        }
        let _ = self.send_event(&tx);
    }

    fn handle_get_matrix_info(&mut self, event: &RxEvent) {
        if event.data.len() != 1 || event.data[0] != self.nickname {
            return;
        }

        let (rows, offset, page) = if cfg!(feature = "dm") {
            (self.dm.rows(), self.dm.offset(), self.dm.page())
        } else {
            (0, 0, 0)
        };

        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::GetMatrixInfoResponse.code(),
            Priority::Normal,
        );
        let page_bytes = page.to_be_bytes();
        tx.set_data(&[rows, offset, page_bytes[0], page_bytes[1]]);
        let _ = self.send_event(&tx);
    }

    fn handle_enter_boot_loader(&mut self, event: &RxEvent) {
        if event.data.len() != 8 || event.data[0] != self.nickname {
            return;
        }

        if cfg!(feature = "bootloader") {
            let algorithm = self.app.boot_loader_algorithm();
            let page_select = u16::from_be_bytes([event.data[6], event.data[7]]);

            // The request must name our algorithm, carry the GUID probe
            // bytes 15/12/10/8 and the current page select.
            let denied = algorithm == 0xFF
                || algorithm != event.data[1]
                || self.guid_byte(15) != event.data[2]
                || self.guid_byte(12) != event.data[3]
                || self.guid_byte(10) != event.data[4]
                || self.guid_byte(8) != event.data[5]
                || self.page_select != page_select;

            if denied {
                self.send_boot_loader_nack();
            } else {
                info!("entering boot loader");
                self.change_to_idle();
                self.store.write_boot_flag(BOOT_FLAG_BOOTLOADER);
                self.app.boot_loader_request();
                // The boot loader sends the acknowledge.
            }
        } else {
            self.send_boot_loader_nack();
        }
    }

    fn send_boot_loader_nack(&mut self) {
        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::NackBootLoader.code(),
            Priority::Normal,
        );
        tx.set_data(&[0]); // User defined error code, unused.
        let _ = self.send_event(&tx);
    }
}
