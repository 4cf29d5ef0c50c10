//! # VSCP System Registers
//!
//! Page 0, addresses 0x80..=0xFF are reserved for the VSCP system
//! registers. Everything below 0x80 on page 0, and every other page,
//! belongs to the decision matrices or the application.

/// First system register address on page 0.
pub const SYSTEM_START: u8 = 0x80;

/// Alarm status; reading latches the value and clears it.
pub const ALARM_STATUS: u8 = 0x80;
/// VSCP specification major version.
pub const VSCP_VERSION_MAJOR: u8 = 0x81;
/// VSCP specification minor version.
pub const VSCP_VERSION_MINOR: u8 = 0x82;
/// Node control flags.
pub const NODE_CONTROL_FLAGS: u8 = 0x83;
/// First user id byte.
pub const USER_ID_0: u8 = 0x84;
/// Last user id byte.
pub const USER_ID_4: u8 = 0x88;
/// First manufacturer device id byte.
pub const MANUFACTURER_DEV_ID_0: u8 = 0x89;
/// Last manufacturer device id byte.
pub const MANUFACTURER_DEV_ID_3: u8 = 0x8C;
/// First manufacturer sub device id byte.
pub const MANUFACTURER_SUB_DEV_ID_0: u8 = 0x8D;
/// Last manufacturer sub device id byte.
pub const MANUFACTURER_SUB_DEV_ID_3: u8 = 0x90;
/// Assigned nickname.
pub const NICKNAME: u8 = 0x91;
/// Page select, high byte.
pub const PAGE_SELECT_MSB: u8 = 0x92;
/// Page select, low byte.
pub const PAGE_SELECT_LSB: u8 = 0x93;
/// Firmware major version.
pub const FIRMWARE_MAJOR: u8 = 0x94;
/// Firmware minor version.
pub const FIRMWARE_MINOR: u8 = 0x95;
/// Firmware sub-minor version.
pub const FIRMWARE_SUB_MINOR: u8 = 0x96;
/// Boot-loader algorithm, 0xFF = none.
pub const BOOT_LOADER_ALGORITHM: u8 = 0x97;
/// Event payload capacity.
pub const BUFFER_SIZE: u8 = 0x98;
/// Number of register pages used by the application.
pub const PAGES_USED: u8 = 0x99;
/// Device family code, most significant byte first.
pub const FAMILY_CODE_START: u8 = 0x9A;
/// Last family code byte.
pub const FAMILY_CODE_END: u8 = 0x9D;
/// Device type, most significant byte first.
pub const DEVICE_TYPE_START: u8 = 0x9E;
/// Last device type byte.
pub const DEVICE_TYPE_END: u8 = 0xA1;
/// Restore-factory-defaults trigger (write 0x55 then 0xAA).
pub const RESTORE_STD_CFG: u8 = 0xA2;
/// GUID byte 15 (first byte on the wire).
pub const GUID_START: u8 = 0xD0;
/// GUID byte 0.
pub const GUID_END: u8 = 0xDF;
/// First MDF URL byte.
pub const MDF_URL_START: u8 = 0xE0;
/// Last MDF URL byte.
pub const MDF_URL_END: u8 = 0xFF;

/// Whether `(page, addr)` is a VSCP system register.
pub const fn is_system(page: u16, addr: u8) -> bool {
    page == 0 && addr >= SYSTEM_START
}
