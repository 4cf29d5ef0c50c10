//! # Register Router
//!
//! The `(page, addr)` space split by ownership: VSCP system registers
//! (core), decision matrix, DM-NG rule set, application, probed in that
//! order. Reads always produce a byte (unowned registers read as 0);
//! writes answer with the stored value or a rejection the caller turns
//! into silence.

use log::info;
use vscp_events::{class, Priority, ProtocolType};
use vscp_hal::{Application, NvMemory, Transport};

use crate::config;
use crate::error::WriteError;
use crate::node::Node;
use crate::registers as reg;

impl<T, N, A> Node<T, N, A>
where
    T: Transport,
    N: NvMemory,
    A: Application,
{
    // -------------------------------------------------------------------------
    // Read path
    // -------------------------------------------------------------------------

    /// Read one register.
    pub fn read_register(&mut self, page: u16, addr: u8) -> u8 {
        if reg::is_system(page, addr) {
            return self.read_system_register(addr);
        }

        if cfg!(feature = "dm") && self.dm.contains(page, addr) {
            let Self { dm, store, .. } = self;
            return dm.read_register(store, page, addr);
        }

        if cfg!(feature = "dm-ng") && self.dm_ng.contains(page, addr) {
            let Self { dm_ng, store, .. } = self;
            return dm_ng.read_register(store, page, addr);
        }

        self.app.reg_read(page, addr)
    }

    fn read_system_register(&mut self, addr: u8) -> u8 {
        match addr {
            reg::ALARM_STATUS => {
                // Reading latches and clears the alarm bits.
                let value = self.alarm_status;
                self.alarm_status = 0;
                value
            }
            reg::VSCP_VERSION_MAJOR => config::VSCP_VERSION_MAJOR,
            reg::VSCP_VERSION_MINOR => config::VSCP_VERSION_MINOR,
            reg::NODE_CONTROL_FLAGS => self.store.read_node_control_flags(),
            reg::USER_ID_0..=reg::USER_ID_4 => self.store.read_user_id(addr - reg::USER_ID_0),
            reg::MANUFACTURER_DEV_ID_0..=reg::MANUFACTURER_DEV_ID_3 => {
                let Self { device, store, .. } = self;
                device.manufacturer_dev_id(store, addr - reg::MANUFACTURER_DEV_ID_0)
            }
            reg::MANUFACTURER_SUB_DEV_ID_0..=reg::MANUFACTURER_SUB_DEV_ID_3 => {
                let Self { device, store, .. } = self;
                device.manufacturer_sub_dev_id(store, addr - reg::MANUFACTURER_SUB_DEV_ID_0)
            }
            reg::NICKNAME => self.nickname,
            reg::PAGE_SELECT_MSB => (self.page_select >> 8) as u8,
            reg::PAGE_SELECT_LSB => self.page_select as u8,
            reg::FIRMWARE_MAJOR => self.device.firmware_version().0,
            reg::FIRMWARE_MINOR => self.device.firmware_version().1,
            reg::FIRMWARE_SUB_MINOR => self.device.firmware_version().2,
            reg::BOOT_LOADER_ALGORITHM => {
                if cfg!(feature = "bootloader") {
                    self.app.boot_loader_algorithm()
                } else {
                    0xFF
                }
            }
            reg::BUFFER_SIZE => config::BUFFER_SIZE,
            reg::PAGES_USED => self.app.reg_pages_used(),
            reg::FAMILY_CODE_START..=reg::FAMILY_CODE_END => {
                // Registers run MSB first, storage LSB first.
                let Self { device, store, .. } = self;
                device.family_code(store, 3 - (addr - reg::FAMILY_CODE_START))
            }
            reg::DEVICE_TYPE_START..=reg::DEVICE_TYPE_END => {
                let Self { device, store, .. } = self;
                device.device_type(store, 3 - (addr - reg::DEVICE_TYPE_START))
            }
            reg::RESTORE_STD_CFG => 0, // Write only.
            reg::GUID_START..=reg::GUID_END => self.guid_byte(15 - (addr - reg::GUID_START)),
            reg::MDF_URL_START..=reg::MDF_URL_END => {
                let Self { device, store, .. } = self;
                device.mdf_url(store, addr - reg::MDF_URL_START)
            }
            _ => 0,
        }
    }

    // -------------------------------------------------------------------------
    // Write path
    // -------------------------------------------------------------------------

    /// Write one register, returning the value actually stored.
    pub fn write_register(&mut self, page: u16, addr: u8, value: u8) -> Result<u8, WriteError> {
        if reg::is_system(page, addr) {
            return self.write_system_register(addr, value);
        }

        if !self.app_writes_enabled() {
            return Err(WriteError::WriteProtected);
        }

        if cfg!(feature = "dm") && self.dm.contains(page, addr) {
            let Self { dm, store, .. } = self;
            return Ok(dm.write_register(store, page, addr, value));
        }

        if cfg!(feature = "dm-ng") && self.dm_ng.contains(page, addr) {
            let Self { dm_ng, store, .. } = self;
            return Ok(dm_ng.write_register(store, page, addr, value));
        }

        Ok(self.app.reg_write(page, addr, value))
    }

    fn write_system_register(&mut self, addr: u8, value: u8) -> Result<u8, WriteError> {
        match addr {
            reg::NODE_CONTROL_FLAGS => {
                self.store.write_node_control_flags(value);
                Ok(self.store.read_node_control_flags())
            }
            reg::USER_ID_0..=reg::USER_ID_4 => {
                let index = addr - reg::USER_ID_0;
                self.store.write_user_id(index, value);
                Ok(self.store.read_user_id(index))
            }
            reg::PAGE_SELECT_MSB => {
                self.page_select = (self.page_select & 0x00FF) | ((value as u16) << 8);
                Ok((self.page_select >> 8) as u8)
            }
            reg::PAGE_SELECT_LSB => {
                self.page_select = (self.page_select & 0xFF00) | value as u16;
                Ok(self.page_select as u8)
            }
            reg::RESTORE_STD_CFG => {
                // Two-step unlock: 0x55 arms the window, 0xAA inside the
                // window triggers the factory reset.
                if value == 0x55 && !self.timer_running(self.timer_reg162) {
                    self.timer_start(self.timer_reg162, self.config.multi_msg_timeout_ms);
                } else if value == 0xAA && self.timer_running(self.timer_reg162) {
                    self.timer_stop(self.timer_reg162);
                    info!("register 162 unlock complete");
                    self.restore_factory_defaults();
                }
                Ok(0)
            }
            _ => Err(WriteError::ReadOnly),
        }
    }

    // -------------------------------------------------------------------------
    // Extended page read continuation
    // -------------------------------------------------------------------------

    /// Produce the next EXTENDED_PAGE_RESPONSE frame of a running read.
    ///
    /// At most four register bytes per frame; the read pauses between
    /// frames and resumes on the next process cycle. Every frame names
    /// the page its registers came from, so a read crossing a page
    /// boundary starts a fresh frame on the new page.
    pub(crate) fn continue_extended_page_read(&mut self) {
        let Some(mut xpr) = self.ext_page_read else {
            return;
        };

        if xpr.count == 0 {
            self.ext_page_read = None;
            return;
        }

        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::ExtendedPageResponse.code(),
            Priority::Low,
        );
        let page_bytes = xpr.page.to_be_bytes();
        tx.set_data(&[xpr.seq, page_bytes[0], page_bytes[1], xpr.addr]);

        let mut addr = xpr.addr;
        let mut count = xpr.count;
        let mut next_page = false;

        loop {
            let value = self.read_register(xpr.page, addr);
            tx.push_data(value);
            count -= 1;

            if addr < 0xFF {
                addr += 1;
            } else {
                next_page = true;
            }

            if tx.data.len() >= 8 || count == 0 || next_page {
                break;
            }
        }

        if self.send_event(&tx) {
            if next_page {
                xpr.page = xpr.page.wrapping_add(1);
                xpr.addr = 0;
            } else {
                xpr.addr = addr;
            }
            xpr.count = count;
            xpr.seq = xpr.seq.wrapping_add(1);

            self.ext_page_read = if count > 0 { Some(xpr) } else { None };
        }
        // On a rejected write the continuation stays put and the same
        // frame is rebuilt next cycle.
    }
}
