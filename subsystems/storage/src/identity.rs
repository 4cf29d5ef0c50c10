//! # Node Identity
//!
//! Who this node is: GUID, zone assignment, manufacturer ids, firmware
//! version, MDF URL and the standard family/type codes. Each field is a
//! compile-time constant from [`NodeIdentity`] by default; enabling the
//! matching `*-ps` feature moves it into persistent storage, with the
//! identity value used to seed storage on factory reset.
//!
//! Multi-byte fields are stored LSB-first, matching the persistent layout;
//! the wire (registers, WHO_IS_THERE) presents them MSB-first, which is the
//! caller's concern.

use vscp_hal::NvMemory;

use crate::store::PersistentStore;

/// Compile-time identity of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    /// GUID, LSB-first (index 15 is the first byte on the wire).
    pub guid: [u8; 16],
    /// Node zone.
    pub zone: u8,
    /// Node sub-zone.
    pub sub_zone: u8,
    /// Manufacturer device id, LSB-first.
    pub manufacturer_dev_id: [u8; 4],
    /// Manufacturer sub device id, LSB-first.
    pub manufacturer_sub_dev_id: [u8; 4],
    /// MDF URL without the implied `http://` prefix, zero padded.
    pub mdf_url: [u8; 32],
    /// Firmware version (major, minor, sub-minor).
    pub firmware_version: (u8, u8, u8),
    /// Standard device family code, LSB-first.
    pub family_code: [u8; 4],
    /// Standard device type, LSB-first.
    pub device_type: [u8; 4],
}

impl NodeIdentity {
    /// Identity with everything zeroed. Real nodes fill in at least the
    /// GUID and MDF URL.
    pub const fn zeroed() -> Self {
        Self {
            guid: [0; 16],
            zone: 0,
            sub_zone: 0,
            manufacturer_dev_id: [0; 4],
            manufacturer_sub_dev_id: [0; 4],
            mdf_url: [0; 32],
            firmware_version: (0, 1, 0),
            family_code: [0; 4],
            device_type: [0; 4],
        }
    }

    /// Set the MDF URL from a string, truncated to 32 bytes, zero padded.
    pub fn set_mdf_url(&mut self, url: &str) {
        self.mdf_url = [0; 32];
        let bytes = url.as_bytes();
        let take = bytes.len().min(32);
        self.mdf_url[..take].copy_from_slice(&bytes[..take]);
    }
}

impl Default for NodeIdentity {
    fn default() -> Self {
        Self::zeroed()
    }
}

// =============================================================================
// DEVICE DATA
// =============================================================================

/// Per-field constant-or-persistent view over a [`NodeIdentity`].
#[derive(Debug)]
pub struct DeviceData {
    identity: NodeIdentity,
}

impl DeviceData {
    /// Wrap an identity.
    pub fn new(identity: NodeIdentity) -> Self {
        Self { identity }
    }

    /// The compile-time identity values.
    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// GUID byte at LSB-first storage `index` (0..=15).
    pub fn guid<N: NvMemory>(&self, store: &mut PersistentStore<N>, index: u8) -> u8 {
        if cfg!(feature = "guid-ps") {
            store.read_guid(index)
        } else {
            self.identity.guid[(index & 0x0F) as usize]
        }
    }

    /// Node zone.
    pub fn zone<N: NvMemory>(&self, store: &mut PersistentStore<N>) -> u8 {
        if cfg!(feature = "zone-ps") {
            store.read_zone()
        } else {
            self.identity.zone
        }
    }

    /// Node sub-zone.
    pub fn sub_zone<N: NvMemory>(&self, store: &mut PersistentStore<N>) -> u8 {
        if cfg!(feature = "sub-zone-ps") {
            store.read_sub_zone()
        } else {
            self.identity.sub_zone
        }
    }

    /// Manufacturer device id byte, LSB-first `index` (0..=3).
    pub fn manufacturer_dev_id<N: NvMemory>(
        &self,
        store: &mut PersistentStore<N>,
        index: u8,
    ) -> u8 {
        if cfg!(feature = "mfr-dev-id-ps") {
            store.read_manufacturer_dev_id(index)
        } else {
            self.identity.manufacturer_dev_id[(index & 0x03) as usize]
        }
    }

    /// Manufacturer sub device id byte, LSB-first `index` (0..=3).
    pub fn manufacturer_sub_dev_id<N: NvMemory>(
        &self,
        store: &mut PersistentStore<N>,
        index: u8,
    ) -> u8 {
        if cfg!(feature = "mfr-sub-dev-id-ps") {
            store.read_manufacturer_sub_dev_id(index)
        } else {
            self.identity.manufacturer_sub_dev_id[(index & 0x03) as usize]
        }
    }

    /// MDF URL byte at `index` (0..=31); out of range reads as padding.
    pub fn mdf_url<N: NvMemory>(&self, store: &mut PersistentStore<N>, index: u8) -> u8 {
        if cfg!(feature = "mdf-url-ps") {
            store.read_mdf_url(index)
        } else {
            self.identity
                .mdf_url
                .get(index as usize)
                .copied()
                .unwrap_or(0)
        }
    }

    /// Family code byte, LSB-first `index` (0..=3).
    pub fn family_code<N: NvMemory>(&self, store: &mut PersistentStore<N>, index: u8) -> u8 {
        if cfg!(feature = "family-code-ps") {
            store.read_family_code(index)
        } else {
            self.identity.family_code[(index & 0x03) as usize]
        }
    }

    /// Device type byte, LSB-first `index` (0..=3).
    pub fn device_type<N: NvMemory>(&self, store: &mut PersistentStore<N>, index: u8) -> u8 {
        if cfg!(feature = "device-type-ps") {
            store.read_device_type(index)
        } else {
            self.identity.device_type[(index & 0x03) as usize]
        }
    }

    /// Firmware version (major, minor, sub-minor). Always compile-time.
    pub fn firmware_version(&self) -> (u8, u8, u8) {
        self.identity.firmware_version
    }

    /// Seed every storage-backed identity field from the compile-time
    /// values. Called during factory reset; a no-op for constant fields.
    pub fn restore_defaults<N: NvMemory>(&self, store: &mut PersistentStore<N>) {
        if cfg!(feature = "guid-ps") {
            for (index, byte) in self.identity.guid.iter().enumerate() {
                store.write_guid(index as u8, *byte);
            }
        }
        if cfg!(feature = "zone-ps") {
            store.write_zone(self.identity.zone);
        }
        if cfg!(feature = "sub-zone-ps") {
            store.write_sub_zone(self.identity.sub_zone);
        }
        if cfg!(feature = "mfr-dev-id-ps") {
            for (index, byte) in self.identity.manufacturer_dev_id.iter().enumerate() {
                store.write_manufacturer_dev_id(index as u8, *byte);
            }
        }
        if cfg!(feature = "mfr-sub-dev-id-ps") {
            for (index, byte) in self.identity.manufacturer_sub_dev_id.iter().enumerate() {
                store.write_manufacturer_sub_dev_id(index as u8, *byte);
            }
        }
        if cfg!(feature = "mdf-url-ps") {
            for (index, byte) in self.identity.mdf_url.iter().enumerate() {
                store.write_mdf_url(index as u8, *byte);
            }
        }
        if cfg!(feature = "family-code-ps") {
            for (index, byte) in self.identity.family_code.iter().enumerate() {
                store.write_family_code(index as u8, *byte);
            }
        }
        if cfg!(feature = "device-type-ps") {
            for (index, byte) in self.identity.device_type.iter().enumerate() {
                store.write_device_type(index as u8, *byte);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
