//! # Standard Decision Matrix
//!
//! The fixed-row table. Rows (and, when enabled, the extension rows that
//! follow them) live in persistent storage and are visible through the
//! register space: either as a directly addressed region starting at a
//! configured `(page, offset)` and spanning as many pages as needed, or,
//! with the `paged` feature, through an index/value pseudo-register pair
//! on page 0.

use log::debug;
use vscp_events::{zone, RxEvent};
use vscp_hal::NvMemory;
use vscp_storage::layout;
use vscp_storage::PersistentStore;

use crate::row::{
    ExtMatchFlags, ExtRow, MatrixRow, RowFlags, ACTION_EXTENDED, ACTION_NO_OPERATION, ROW_SIZE,
};

/// Pseudo-register address of the byte index (`paged` mode).
pub const PAGED_INDEX_ADDR: u8 = 0x7E;

/// Pseudo-register address of the byte value (`paged` mode).
pub const PAGED_VALUE_ADDR: u8 = 0x7F;

/// The standard decision matrix.
#[derive(Debug)]
pub struct DecisionMatrix {
    page: u16,
    offset: u8,
    /// Byte index cursor for the paged pseudo-register interface.
    paged_index: u8,
}

impl DecisionMatrix {
    /// Create a matrix rooted at `(page, offset)` in the register space.
    /// In `paged` mode the location is fixed to page 0 and the arguments
    /// only matter for storage, not addressing.
    pub fn new(page: u16, offset: u8) -> Self {
        Self {
            page,
            offset,
            paged_index: 0,
        }
    }

    /// Number of standard rows.
    pub fn rows(&self) -> u8 {
        layout::DM_ROWS as u8
    }

    /// Number of addressable rows, extension included.
    fn total_rows(&self) -> u16 {
        if cfg!(feature = "extension") {
            2 * layout::DM_ROWS
        } else {
            layout::DM_ROWS
        }
    }

    /// Total number of register-addressable matrix bytes.
    fn total_bytes(&self) -> u16 {
        self.total_rows() * ROW_SIZE as u16
    }

    /// Register page the matrix starts on.
    pub fn page(&self) -> u16 {
        if cfg!(feature = "paged") {
            0
        } else {
            self.page
        }
    }

    /// Offset of the matrix in its first page.
    pub fn offset(&self) -> u8 {
        if cfg!(feature = "paged") {
            PAGED_INDEX_ADDR
        } else {
            self.offset
        }
    }

    // -------------------------------------------------------------------------
    // Register interface
    // -------------------------------------------------------------------------

    /// Byte index of `(page, addr)` in the matrix region, if inside.
    fn byte_index(&self, page: u16, addr: u8) -> Option<u16> {
        if page < self.page {
            return None;
        }
        let index = (page - self.page) as i32 * 256 + addr as i32 - self.offset as i32;
        if index >= 0 && (index as u16) < self.total_bytes() {
            Some(index as u16)
        } else {
            None
        }
    }

    /// Whether `(page, addr)` belongs to the matrix.
    pub fn contains(&self, page: u16, addr: u8) -> bool {
        if cfg!(feature = "paged") {
            page == 0 && (addr == PAGED_INDEX_ADDR || addr == PAGED_VALUE_ADDR)
        } else {
            self.total_bytes() > 0 && self.byte_index(page, addr).is_some()
        }
    }

    fn read_byte<N: NvMemory>(&self, store: &mut PersistentStore<N>, index: u16) -> u8 {
        if index < layout::DM.size {
            store.read_dm(index)
        } else {
            store.read_dm_ext(index - layout::DM.size)
        }
    }

    fn write_byte<N: NvMemory>(&self, store: &mut PersistentStore<N>, index: u16, value: u8) {
        if index < layout::DM.size {
            store.write_dm(index, value);
        } else {
            store.write_dm_ext(index - layout::DM.size, value);
        }
    }

    /// Read a matrix register.
    pub fn read_register<N: NvMemory>(
        &self,
        store: &mut PersistentStore<N>,
        page: u16,
        addr: u8,
    ) -> u8 {
        if cfg!(feature = "paged") {
            if page != 0 {
                return 0;
            }
            match addr {
                PAGED_INDEX_ADDR => self.paged_index,
                PAGED_VALUE_ADDR => {
                    let index = self.paged_index as u16;
                    if index < self.total_bytes() {
                        self.read_byte(store, index)
                    } else {
                        0
                    }
                }
                _ => 0,
            }
        } else {
            match self.byte_index(page, addr) {
                Some(index) => self.read_byte(store, index),
                None => 0,
            }
        }
    }

    /// Write a matrix register and return the stored value.
    pub fn write_register<N: NvMemory>(
        &mut self,
        store: &mut PersistentStore<N>,
        page: u16,
        addr: u8,
        value: u8,
    ) -> u8 {
        if cfg!(feature = "paged") {
            if page != 0 {
                return value;
            }
            match addr {
                PAGED_INDEX_ADDR => {
                    // Out-of-range cursors are dropped so a following value
                    // access cannot leave the matrix.
                    if (value as u16) < self.total_bytes() {
                        self.paged_index = value;
                    }
                    self.paged_index
                }
                PAGED_VALUE_ADDR => {
                    let index = self.paged_index as u16;
                    if index < self.total_bytes() {
                        self.write_byte(store, index, value);
                        self.read_byte(store, index)
                    } else {
                        0
                    }
                }
                _ => value,
            }
        } else {
            match self.byte_index(page, addr) {
                Some(index) => {
                    self.write_byte(store, index, value);
                    self.read_byte(store, index)
                }
                None => value,
            }
        }
    }

    // -------------------------------------------------------------------------
    // Row access
    // -------------------------------------------------------------------------

    fn load_row<N: NvMemory>(&self, store: &mut PersistentStore<N>, row_index: u8) -> MatrixRow {
        let start = row_index as u16 * ROW_SIZE as u16;
        let mut bytes = [0u8; ROW_SIZE];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = store.read_dm(start + offset as u16);
        }
        MatrixRow::from_bytes(bytes)
    }

    fn load_ext_row<N: NvMemory>(&self, store: &mut PersistentStore<N>, row_index: u8) -> ExtRow {
        let start = row_index as u16 * ROW_SIZE as u16;
        let mut bytes = [0u8; ROW_SIZE];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = store.read_dm_ext(start + offset as u16);
        }
        ExtRow::from_bytes(bytes)
    }

    /// Clear every row (and extension row) to zero.
    pub fn restore_defaults<N: NvMemory>(store: &mut PersistentStore<N>) {
        store.clear_dm();
        store.clear_dm_ext();
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Evaluate every row against `event`, firing `action` for each match.
    ///
    /// `node_zone` / `node_sub_zone` are the device's own assignment; an
    /// extension row replaces them for its standard row.
    pub fn execute<N, F>(
        &self,
        store: &mut PersistentStore<N>,
        node_zone: u8,
        node_sub_zone: u8,
        event: &RxEvent,
        mut action: F,
    ) where
        N: NvMemory,
        F: FnMut(u8, u8, &RxEvent),
    {
        for row_index in 0..self.rows() {
            let row = self.load_row(store, row_index);
            let flags = row.row_flags();

            if !flags.contains(RowFlags::ENABLE) || row.action == ACTION_NO_OPERATION {
                continue;
            }

            if flags.contains(RowFlags::CHECK_ORIGIN) && row.origin != event.origin {
                continue;
            }

            if flags.contains(RowFlags::HARDCODED) && !event.hard_coded {
                continue;
            }

            let extension_active =
                cfg!(feature = "extension") && row.action == ACTION_EXTENDED;
            let ext_row = if extension_active {
                Some(self.load_ext_row(store, row_index))
            } else {
                None
            };

            if flags.intersects(RowFlags::MATCH_ZONE | RowFlags::MATCH_SUB_ZONE) {
                let Some(zone_idx) = zone::zone_index(event.class, event.event_type) else {
                    continue;
                };

                if flags.contains(RowFlags::MATCH_ZONE) {
                    let wanted = ext_row.map(|ext| ext.zone).unwrap_or(node_zone);
                    match event.data.get(zone_idx as usize) {
                        Some(have) if *have == wanted => {}
                        _ => continue,
                    }
                }

                if flags.contains(RowFlags::MATCH_SUB_ZONE) {
                    let wanted = ext_row.map(|ext| ext.sub_zone).unwrap_or(node_sub_zone);
                    match event.data.get(zone_idx as usize + 1) {
                        Some(have) if *have == wanted => {}
                        _ => continue,
                    }
                }
            }

            let class_mask = row.class_mask16();
            if class_mask != 0 && (event.class & class_mask) != row.class_filter16() {
                continue;
            }

            if row.type_mask != 0 && (event.event_type & row.type_mask) != row.type_filter {
                continue;
            }

            if let Some(ext) = ext_row {
                let selectors = ExtMatchFlags::from_bits_truncate(row.action_param);

                let pairs = [
                    (ExtMatchFlags::PAR_0, 0usize, ext.par0),
                    (ExtMatchFlags::PAR_3, 3, ext.par3),
                    (ExtMatchFlags::PAR_4, 4, ext.par4),
                    (ExtMatchFlags::PAR_5, 5, ext.par5),
                ];

                let all_match = pairs.iter().all(|(selector, index, wanted)| {
                    !selectors.contains(*selector)
                        || event.data.get(*index) == Some(wanted)
                });
                if !all_match {
                    continue;
                }

                debug!("dm row {} fires extension action {:#04x}", row_index, ext.action);
                action(ext.action, ext.action_param, event);
            } else {
                debug!("dm row {} fires action {:#04x}", row_index, row.action);
                action(row.action, row.action_param, event);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
