//! # Class-Local Type Codes
//!
//! The subset of class-local type constants the framework itself needs:
//! the zone-index table, the node heartbeat and the bus logger. The full
//! per-class tables are application material and out of scope here.

/// CLASS1.INFORMATION types.
pub mod information {
    /// Node heartbeat.
    pub const NODE_HEARTBEAT: u8 = 9;
    /// Stream data.
    pub const STREAM_DATA: u8 = 36;
    /// Stream data with zone.
    pub const STREAM_DATA_WITH_ZONE: u8 = 38;
    /// Confirm.
    pub const CONFIRM: u8 = 39;
}

/// CLASS1.CONTROL types.
pub mod control {
    /// Deactivate.
    pub const DEACTIVATE: u8 = 16;
    /// Dim lamp(s).
    pub const DIM_LAMP: u8 = 20;
    /// Stream data.
    pub const STREAM_DATA: u8 = 25;
}

/// CLASS1.PHONE types.
pub mod phone {
    /// Answer.
    pub const ANSWER: u8 = 4;
}

/// CLASS1.DISPLAY types.
pub mod display {
    /// Set display buffer parameter.
    pub const SET_DISPLAY_BUFFER_PARAMETER: u8 = 6;
}

/// CLASS1.REMOTE types.
pub mod remote {
    /// VSCP abstract remote format.
    pub const VSCP_ABSTRACT: u8 = 48;
    /// MAPito remote format.
    pub const MAPITO: u8 = 49;
}

/// CLASS1.LOG types.
pub mod log {
    /// Log message.
    pub const MESSAGE: u8 = 1;
    /// Start logging.
    pub const START: u8 = 2;
    /// Stop logging.
    pub const STOP: u8 = 3;
    /// Set log level.
    pub const LEVEL: u8 = 4;
}
