//! # Matrix Rows
//!
//! The 8-byte standard and extension row formats. The register interface
//! addresses the matrix byte-wise, so both rows must stay exactly
//! [`ROW_SIZE`] bytes wide; the asserts below pin that down.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

/// Width of a matrix row in bytes.
pub const ROW_SIZE: usize = 8;

/// Action id meaning "row disabled by action" (no operation).
pub const ACTION_NO_OPERATION: u8 = 0x00;

/// Action id routing the row to its extension row.
pub const ACTION_EXTENDED: u8 = 0xFF;

bitflags! {
    /// Standard row flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RowFlags: u8 {
        /// Bit 8 of the class filter.
        const CLASS_FILTER_BIT8 = 0x01;
        /// Bit 8 of the class mask.
        const CLASS_MASK_BIT8 = 0x02;
        /// Event sub-zone must match.
        const MATCH_SUB_ZONE = 0x08;
        /// Event zone must match.
        const MATCH_ZONE = 0x10;
        /// Event must come from a hard-coded node.
        const HARDCODED = 0x20;
        /// Event origin must equal the row's origin address.
        const CHECK_ORIGIN = 0x40;
        /// Row participates in evaluation.
        const ENABLE = 0x80;
    }
}

bitflags! {
    /// Extension match selectors, carried in the standard row's action
    /// parameter when the action id is [`ACTION_EXTENDED`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExtMatchFlags: u8 {
        /// Compare payload byte 0 against `par0`.
        const PAR_0 = 0x01;
        /// Compare payload byte 3 against `par3`.
        const PAR_3 = 0x02;
        /// Compare payload byte 4 against `par4`.
        const PAR_4 = 0x04;
        /// Compare payload byte 5 against `par5`.
        const PAR_5 = 0x08;
    }
}

// =============================================================================
// STANDARD ROW
// =============================================================================

/// One standard decision-matrix row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct MatrixRow {
    /// Expected origin nickname (with [`RowFlags::CHECK_ORIGIN`]).
    pub origin: u8,
    /// Raw row flags.
    pub flags: u8,
    /// Class mask, low 8 bits.
    pub class_mask: u8,
    /// Class filter, low 8 bits.
    pub class_filter: u8,
    /// Type mask.
    pub type_mask: u8,
    /// Type filter.
    pub type_filter: u8,
    /// Action id.
    pub action: u8,
    /// Action parameter (extension selectors for [`ACTION_EXTENDED`]).
    pub action_param: u8,
}

const_assert_eq!(core::mem::size_of::<MatrixRow>(), ROW_SIZE);

impl MatrixRow {
    /// Decode a row from its storage bytes.
    pub fn from_bytes(bytes: [u8; ROW_SIZE]) -> Self {
        Self {
            origin: bytes[0],
            flags: bytes[1],
            class_mask: bytes[2],
            class_filter: bytes[3],
            type_mask: bytes[4],
            type_filter: bytes[5],
            action: bytes[6],
            action_param: bytes[7],
        }
    }

    /// Encode the row into its storage bytes.
    pub fn to_bytes(&self) -> [u8; ROW_SIZE] {
        [
            self.origin,
            self.flags,
            self.class_mask,
            self.class_filter,
            self.type_mask,
            self.type_filter,
            self.action,
            self.action_param,
        ]
    }

    /// Typed view of the flags byte.
    pub fn row_flags(&self) -> RowFlags {
        RowFlags::from_bits_truncate(self.flags)
    }

    /// 9-bit class mask, bit 8 taken from the flags.
    pub fn class_mask16(&self) -> u16 {
        let mut mask = self.class_mask as u16;
        if self.row_flags().contains(RowFlags::CLASS_MASK_BIT8) {
            mask |= 0x0100;
        }
        mask
    }

    /// 9-bit class filter, bit 8 taken from the flags.
    pub fn class_filter16(&self) -> u16 {
        let mut filter = self.class_filter as u16;
        if self.row_flags().contains(RowFlags::CLASS_FILTER_BIT8) {
            filter |= 0x0100;
        }
        filter
    }
}

// =============================================================================
// EXTENSION ROW
// =============================================================================

/// One decision-matrix extension row, same width as a standard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct ExtRow {
    /// Zone the event must carry (replaces the node zone).
    pub zone: u8,
    /// Sub-zone the event must carry (replaces the node sub-zone).
    pub sub_zone: u8,
    /// Expected payload byte 0.
    pub par0: u8,
    /// Expected payload byte 3.
    pub par3: u8,
    /// Expected payload byte 4.
    pub par4: u8,
    /// Expected payload byte 5.
    pub par5: u8,
    /// Action id fired on a full match.
    pub action: u8,
    /// Action parameter.
    pub action_param: u8,
}

const_assert_eq!(core::mem::size_of::<ExtRow>(), ROW_SIZE);

impl ExtRow {
    /// Decode an extension row from its storage bytes.
    pub fn from_bytes(bytes: [u8; ROW_SIZE]) -> Self {
        Self {
            zone: bytes[0],
            sub_zone: bytes[1],
            par0: bytes[2],
            par3: bytes[3],
            par4: bytes[4],
            par5: bytes[5],
            action: bytes[6],
            action_param: bytes[7],
        }
    }

    /// Encode the extension row into its storage bytes.
    pub fn to_bytes(&self) -> [u8; ROW_SIZE] {
        [
            self.zone,
            self.sub_zone,
            self.par0,
            self.par3,
            self.par4,
            self.par5,
            self.action,
            self.action_param,
        ]
    }
}
