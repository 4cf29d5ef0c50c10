//! # Persistent Region Layout
//!
//! The persistent region is a sequence of fixed-size fields at cumulative
//! offsets. A field guarded by a cargo feature occupies zero bytes when the
//! feature is off, so every following field moves up and no space is
//! wasted. All offsets are computed in `const` context; changing a feature
//! set changes the layout, which is why the whole region is versioned by
//! the firmware, not by this crate.
//!
//! Region order (matches the wire-era EEPROM layout):
//! boot flag, nickname, segment CRC, node control flags, user id, GUID,
//! zone, sub-zone, manufacturer device id, manufacturer sub device id,
//! MDF URL, family code, device type, log stream id, DM, DM extension,
//! DM-NG rule set.

/// Size of the user id field in bytes.
pub const USER_ID_SIZE: u16 = 5;

/// Size of a GUID in bytes.
pub const GUID_SIZE: u16 = 16;

/// Size of the MDF URL field in bytes.
pub const MDF_URL_SIZE: u16 = 32;

/// Width of one decision-matrix row in bytes.
pub const DM_ROW_SIZE: u16 = 8;

/// Number of decision-matrix rows (standard rows; the extension adds the
/// same count again).
pub const DM_ROWS: u16 = 10;

/// Size of the DM-NG rule set region in bytes.
pub const DM_NG_RULE_SET_SIZE: u16 = 80;

// =============================================================================
// REGIONS
// =============================================================================

/// One contiguous field in the persistent region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First byte address.
    pub addr: u16,
    /// Size in bytes; zero when the field is compiled out.
    pub size: u16,
}

impl Region {
    /// Address one past the last byte.
    pub const fn end(&self) -> u16 {
        self.addr + self.size
    }

    /// Whether the field occupies space in this build.
    pub const fn is_present(&self) -> bool {
        self.size > 0
    }
}

const fn sized(enabled: bool, size: u16) -> u16 {
    if enabled {
        size
    } else {
        0
    }
}

/// Boot flag (feature `bootloader`).
pub const BOOT_FLAG: Region = Region {
    addr: 0,
    size: sized(cfg!(feature = "bootloader"), 1),
};

/// Assigned nickname.
pub const NICKNAME: Region = Region {
    addr: BOOT_FLAG.end(),
    size: 1,
};

/// Segment controller CRC (feature `segment-crc`).
pub const SEGMENT_CRC: Region = Region {
    addr: NICKNAME.end(),
    size: sized(cfg!(feature = "segment-crc"), 1),
};

/// Node control flags.
pub const NODE_CONTROL_FLAGS: Region = Region {
    addr: SEGMENT_CRC.end(),
    size: 1,
};

/// User id bytes.
pub const USER_ID: Region = Region {
    addr: NODE_CONTROL_FLAGS.end(),
    size: USER_ID_SIZE,
};

/// GUID, LSB-first (feature `guid-ps`).
pub const GUID: Region = Region {
    addr: USER_ID.end(),
    size: sized(cfg!(feature = "guid-ps"), GUID_SIZE),
};

/// Node zone (feature `zone-ps`).
pub const ZONE: Region = Region {
    addr: GUID.end(),
    size: sized(cfg!(feature = "zone-ps"), 1),
};

/// Node sub-zone (feature `sub-zone-ps`).
pub const SUB_ZONE: Region = Region {
    addr: ZONE.end(),
    size: sized(cfg!(feature = "sub-zone-ps"), 1),
};

/// Manufacturer device id (feature `mfr-dev-id-ps`).
pub const MANUFACTURER_DEV_ID: Region = Region {
    addr: SUB_ZONE.end(),
    size: sized(cfg!(feature = "mfr-dev-id-ps"), 4),
};

/// Manufacturer sub device id (feature `mfr-sub-dev-id-ps`).
pub const MANUFACTURER_SUB_DEV_ID: Region = Region {
    addr: MANUFACTURER_DEV_ID.end(),
    size: sized(cfg!(feature = "mfr-sub-dev-id-ps"), 4),
};

/// MDF URL, zero padded (feature `mdf-url-ps`).
pub const MDF_URL: Region = Region {
    addr: MANUFACTURER_SUB_DEV_ID.end(),
    size: sized(cfg!(feature = "mdf-url-ps"), MDF_URL_SIZE),
};

/// Device family code, LSB-first (feature `family-code-ps`).
pub const FAMILY_CODE: Region = Region {
    addr: MDF_URL.end(),
    size: sized(cfg!(feature = "family-code-ps"), 4),
};

/// Device type, LSB-first (feature `device-type-ps`).
pub const DEVICE_TYPE: Region = Region {
    addr: FAMILY_CODE.end(),
    size: sized(cfg!(feature = "device-type-ps"), 4),
};

/// Log stream id (feature `logger`).
pub const LOG_STREAM_ID: Region = Region {
    addr: DEVICE_TYPE.end(),
    size: sized(cfg!(feature = "logger"), 1),
};

/// Decision matrix rows (feature `dm`).
pub const DM: Region = Region {
    addr: LOG_STREAM_ID.end(),
    size: sized(cfg!(feature = "dm"), DM_ROWS * DM_ROW_SIZE),
};

/// Decision matrix extension rows (feature `dm-extension`).
pub const DM_EXTENSION: Region = Region {
    addr: DM.end(),
    size: sized(cfg!(feature = "dm-extension"), DM_ROWS * DM_ROW_SIZE),
};

/// DM-NG rule set (feature `dm-ng`).
pub const DM_NG: Region = Region {
    addr: DM_EXTENSION.end(),
    size: sized(cfg!(feature = "dm-ng"), DM_NG_RULE_SET_SIZE),
};

/// Total size of the persistent region for this feature set.
pub const TOTAL_SIZE: u16 = DM_NG.end();

// =============================================================================
// REGION TABLE
// =============================================================================

/// Identifier of one layout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionId {
    /// Boot flag.
    BootFlag,
    /// Nickname.
    Nickname,
    /// Segment controller CRC.
    SegmentCrc,
    /// Node control flags.
    NodeControlFlags,
    /// User id.
    UserId,
    /// GUID.
    Guid,
    /// Zone.
    Zone,
    /// Sub-zone.
    SubZone,
    /// Manufacturer device id.
    ManufacturerDevId,
    /// Manufacturer sub device id.
    ManufacturerSubDevId,
    /// MDF URL.
    MdfUrl,
    /// Device family code.
    FamilyCode,
    /// Device type.
    DeviceType,
    /// Log stream id.
    LogStreamId,
    /// Decision matrix.
    Dm,
    /// Decision matrix extension.
    DmExtension,
    /// DM-NG rule set.
    DmNg,
}

/// All layout fields in address order.
pub const ALL_REGIONS: [RegionId; 17] = [
    RegionId::BootFlag,
    RegionId::Nickname,
    RegionId::SegmentCrc,
    RegionId::NodeControlFlags,
    RegionId::UserId,
    RegionId::Guid,
    RegionId::Zone,
    RegionId::SubZone,
    RegionId::ManufacturerDevId,
    RegionId::ManufacturerSubDevId,
    RegionId::MdfUrl,
    RegionId::FamilyCode,
    RegionId::DeviceType,
    RegionId::LogStreamId,
    RegionId::Dm,
    RegionId::DmExtension,
    RegionId::DmNg,
];

/// Look up the region descriptor for a field.
pub const fn region(id: RegionId) -> Region {
    match id {
        RegionId::BootFlag => BOOT_FLAG,
        RegionId::Nickname => NICKNAME,
        RegionId::SegmentCrc => SEGMENT_CRC,
        RegionId::NodeControlFlags => NODE_CONTROL_FLAGS,
        RegionId::UserId => USER_ID,
        RegionId::Guid => GUID,
        RegionId::Zone => ZONE,
        RegionId::SubZone => SUB_ZONE,
        RegionId::ManufacturerDevId => MANUFACTURER_DEV_ID,
        RegionId::ManufacturerSubDevId => MANUFACTURER_SUB_DEV_ID,
        RegionId::MdfUrl => MDF_URL,
        RegionId::FamilyCode => FAMILY_CODE,
        RegionId::DeviceType => DEVICE_TYPE,
        RegionId::LogStreamId => LOG_STREAM_ID,
        RegionId::Dm => DM,
        RegionId::DmExtension => DM_EXTENSION,
        RegionId::DmNg => DM_NG,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_are_contiguous() {
        let mut cursor = 0u16;
        for id in ALL_REGIONS {
            let r = region(id);
            assert_eq!(r.addr, cursor, "{:?} does not start where {:?} ends", id, cursor);
            cursor = r.end();
        }
        assert_eq!(cursor, TOTAL_SIZE);
    }

    #[test]
    fn test_mandatory_fields_present() {
        assert!(NICKNAME.is_present());
        assert!(NODE_CONTROL_FLAGS.is_present());
        assert_eq!(USER_ID.size, USER_ID_SIZE);
    }

    #[cfg(all(feature = "dm", feature = "dm-extension"))]
    #[test]
    fn test_extension_follows_matrix() {
        assert_eq!(DM_EXTENSION.addr, DM.end());
        assert_eq!(DM_EXTENSION.size, DM.size);
    }
}
