//! # Typed Store
//!
//! Bounds-checked accessors over the [`layout`](crate::layout) regions.
//! Reads outside a region (or from a compiled-out region) return 0 and
//! writes there are dropped, so callers never have to re-check the active
//! feature set.

use bitflags::bitflags;
use vscp_hal::NvMemory;

use crate::layout::{self, Region};

bitflags! {
    /// Node control flags, persisted at a fixed offset.
    ///
    /// Bits 6..7 are the start-up control and may only read `01b`
    /// (initialise at boot) or `10b` (wait for manual init); anything else
    /// marks the persistent region as uninitialised.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeControlFlags: u8 {
        /// Application register writes are accepted.
        const APP_REG_WRITE_ENABLE = 0x20;
        /// Start-up control bit 6: initialise at boot (`01b`).
        const STARTUP_AUTO = 0x40;
        /// Start-up control bit 7: wait for manual init (`10b`).
        const STARTUP_WAIT = 0x80;
    }
}

impl NodeControlFlags {
    /// Factory default: wait for manual init, writes protected.
    pub const DEFAULT: NodeControlFlags = NodeControlFlags::STARTUP_WAIT;

    /// The two start-up-control bits as a value in 0..=3.
    pub const fn startup_control(self) -> u8 {
        (self.bits() >> 6) & 0x03
    }
}

/// Typed access to the persistent region.
#[derive(Debug)]
pub struct PersistentStore<N: NvMemory> {
    nvm: N,
}

impl<N: NvMemory> PersistentStore<N> {
    /// Wrap a byte driver.
    pub fn new(nvm: N) -> Self {
        Self { nvm }
    }

    /// Access the underlying driver.
    pub fn nvm_mut(&mut self) -> &mut N {
        &mut self.nvm
    }

    fn read_at(&mut self, region: Region, offset: u16) -> u8 {
        if offset < region.size {
            self.nvm.read8(region.addr + offset)
        } else {
            0
        }
    }

    fn write_at(&mut self, region: Region, offset: u16, value: u8) {
        if offset < region.size {
            self.nvm.write8(region.addr + offset, value);
        }
    }

    fn fill(&mut self, region: Region, value: u8) {
        for offset in 0..region.size {
            self.nvm.write8(region.addr + offset, value);
        }
    }

    // -------------------------------------------------------------------------
    // Scalar fields
    // -------------------------------------------------------------------------

    /// Boot flag.
    pub fn read_boot_flag(&mut self) -> u8 {
        self.read_at(layout::BOOT_FLAG, 0)
    }

    /// Set the boot flag.
    pub fn write_boot_flag(&mut self, value: u8) {
        self.write_at(layout::BOOT_FLAG, 0, value);
    }

    /// Assigned nickname (0xFF = none).
    pub fn read_nickname(&mut self) -> u8 {
        self.read_at(layout::NICKNAME, 0)
    }

    /// Persist the nickname.
    pub fn write_nickname(&mut self, nickname: u8) {
        self.write_at(layout::NICKNAME, 0, nickname);
    }

    /// Segment controller CRC.
    pub fn read_segment_crc(&mut self) -> u8 {
        self.read_at(layout::SEGMENT_CRC, 0)
    }

    /// Persist the segment controller CRC.
    pub fn write_segment_crc(&mut self, crc: u8) {
        self.write_at(layout::SEGMENT_CRC, 0, crc);
    }

    /// Node control flags, raw.
    pub fn read_node_control_flags(&mut self) -> u8 {
        self.read_at(layout::NODE_CONTROL_FLAGS, 0)
    }

    /// Persist the node control flags.
    pub fn write_node_control_flags(&mut self, flags: u8) {
        self.write_at(layout::NODE_CONTROL_FLAGS, 0, flags);
    }

    /// Log stream id.
    pub fn read_log_stream_id(&mut self) -> u8 {
        self.read_at(layout::LOG_STREAM_ID, 0)
    }

    /// Persist the log stream id.
    pub fn write_log_stream_id(&mut self, id: u8) {
        self.write_at(layout::LOG_STREAM_ID, 0, id);
    }

    // -------------------------------------------------------------------------
    // Indexed fields
    // -------------------------------------------------------------------------

    /// One user id byte, index 0..=4.
    pub fn read_user_id(&mut self, index: u8) -> u8 {
        self.read_at(layout::USER_ID, index as u16)
    }

    /// Write one user id byte.
    pub fn write_user_id(&mut self, index: u8, value: u8) {
        self.write_at(layout::USER_ID, index as u16, value);
    }

    /// One GUID byte, LSB-first storage index 0..=15.
    pub fn read_guid(&mut self, index: u8) -> u8 {
        self.read_at(layout::GUID, index as u16)
    }

    /// Write one GUID byte.
    pub fn write_guid(&mut self, index: u8, value: u8) {
        self.write_at(layout::GUID, index as u16, value);
    }

    /// Node zone.
    pub fn read_zone(&mut self) -> u8 {
        self.read_at(layout::ZONE, 0)
    }

    /// Persist the node zone.
    pub fn write_zone(&mut self, zone: u8) {
        self.write_at(layout::ZONE, 0, zone);
    }

    /// Node sub-zone.
    pub fn read_sub_zone(&mut self) -> u8 {
        self.read_at(layout::SUB_ZONE, 0)
    }

    /// Persist the node sub-zone.
    pub fn write_sub_zone(&mut self, sub_zone: u8) {
        self.write_at(layout::SUB_ZONE, 0, sub_zone);
    }

    /// One manufacturer device id byte, index 0..=3.
    pub fn read_manufacturer_dev_id(&mut self, index: u8) -> u8 {
        self.read_at(layout::MANUFACTURER_DEV_ID, index as u16)
    }

    /// Write one manufacturer device id byte.
    pub fn write_manufacturer_dev_id(&mut self, index: u8, value: u8) {
        self.write_at(layout::MANUFACTURER_DEV_ID, index as u16, value);
    }

    /// One manufacturer sub device id byte, index 0..=3.
    pub fn read_manufacturer_sub_dev_id(&mut self, index: u8) -> u8 {
        self.read_at(layout::MANUFACTURER_SUB_DEV_ID, index as u16)
    }

    /// Write one manufacturer sub device id byte.
    pub fn write_manufacturer_sub_dev_id(&mut self, index: u8, value: u8) {
        self.write_at(layout::MANUFACTURER_SUB_DEV_ID, index as u16, value);
    }

    /// One MDF URL byte, index 0..=31.
    pub fn read_mdf_url(&mut self, index: u8) -> u8 {
        self.read_at(layout::MDF_URL, index as u16)
    }

    /// Write one MDF URL byte.
    pub fn write_mdf_url(&mut self, index: u8, value: u8) {
        self.write_at(layout::MDF_URL, index as u16, value);
    }

    /// One family code byte, LSB-first index 0..=3.
    pub fn read_family_code(&mut self, index: u8) -> u8 {
        self.read_at(layout::FAMILY_CODE, index as u16)
    }

    /// Write one family code byte.
    pub fn write_family_code(&mut self, index: u8, value: u8) {
        self.write_at(layout::FAMILY_CODE, index as u16, value);
    }

    /// One device type byte, LSB-first index 0..=3.
    pub fn read_device_type(&mut self, index: u8) -> u8 {
        self.read_at(layout::DEVICE_TYPE, index as u16)
    }

    /// Write one device type byte.
    pub fn write_device_type(&mut self, index: u8, value: u8) {
        self.write_at(layout::DEVICE_TYPE, index as u16, value);
    }

    // -------------------------------------------------------------------------
    // Matrix regions
    // -------------------------------------------------------------------------

    /// One decision-matrix byte.
    pub fn read_dm(&mut self, index: u16) -> u8 {
        self.read_at(layout::DM, index)
    }

    /// Write one decision-matrix byte.
    pub fn write_dm(&mut self, index: u16, value: u8) {
        self.write_at(layout::DM, index, value);
    }

    /// One decision-matrix extension byte.
    pub fn read_dm_ext(&mut self, index: u16) -> u8 {
        self.read_at(layout::DM_EXTENSION, index)
    }

    /// Write one decision-matrix extension byte.
    pub fn write_dm_ext(&mut self, index: u16, value: u8) {
        self.write_at(layout::DM_EXTENSION, index, value);
    }

    /// One DM-NG rule-set byte.
    pub fn read_dm_ng(&mut self, index: u16) -> u8 {
        self.read_at(layout::DM_NG, index)
    }

    /// Write one DM-NG rule-set byte.
    pub fn write_dm_ng(&mut self, index: u16, value: u8) {
        self.write_at(layout::DM_NG, index, value);
    }

    // -------------------------------------------------------------------------
    // Factory reset helpers
    // -------------------------------------------------------------------------

    /// Zero the user id.
    pub fn clear_user_id(&mut self) {
        self.fill(layout::USER_ID, 0);
    }

    /// Zero the decision matrix.
    pub fn clear_dm(&mut self) {
        self.fill(layout::DM, 0);
    }

    /// Zero the decision-matrix extension.
    pub fn clear_dm_ext(&mut self) {
        self.fill(layout::DM_EXTENSION, 0);
    }

    /// Zero the DM-NG rule set.
    pub fn clear_dm_ng(&mut self) {
        self.fill(layout::DM_NG, 0);
    }
}

// =============================================================================
// TESTS
// =============================================================================
