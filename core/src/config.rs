//! # Core Configuration
//!
//! Protocol constants the framework is compliant to and the per-node
//! tunables. The timeouts are protocol defaults; products normally keep
//! them.

/// VSCP specification major version implemented by the core.
pub const VSCP_VERSION_MAJOR: u8 = 1;

/// VSCP specification minor version implemented by the core.
pub const VSCP_VERSION_MINOR: u8 = 13;

/// Event payload capacity reported through the buffer-size register.
pub const BUFFER_SIZE: u8 = 8;

/// Number of timer slots the core allocates from.
pub const TIMER_POOL_SIZE: usize = 8;

/// One second, in timer milliseconds.
pub const SECOND_MS: u16 = 1000;

/// Runtime configuration of a node.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// How long to wait for the segment master after the first probe.
    pub segment_init_timeout_ms: u16,
    /// How long a probed nickname may stay silent before it is taken.
    pub probe_ack_timeout_ms: u16,
    /// Window for multi-frame sequences (GUID reset, register 162).
    pub multi_msg_timeout_ms: u16,
    /// Node heartbeat period.
    pub heartbeat_period_ms: u16,
    /// Register page the decision matrix starts on.
    pub dm_page: u16,
    /// Offset of the decision matrix in its first page.
    pub dm_offset: u8,
    /// Register page the DM-NG rule set starts on.
    pub dm_ng_page: u16,
    /// First nickname tried during self discovery.
    pub start_probe_nickname: u8,
    /// This node has a fixed, hard-coded nickname.
    pub hard_coded: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            segment_init_timeout_ms: 5000,
            probe_ack_timeout_ms: 2000,
            multi_msg_timeout_ms: 1000,
            heartbeat_period_ms: 1000,
            dm_page: 1,
            dm_offset: 0,
            dm_ng_page: 2,
            start_probe_nickname: 1,
            hard_coded: false,
        }
    }
}
