//! # Core Errors
//!
//! The few ways the core itself can fail. Network input never produces an
//! error (malformed events are dropped where they are parsed), so what
//! remains is resource exhaustion at start-up and register-write
//! rejections, which stay internal to the router.

use core::fmt;

/// Fatal initialisation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// No free slot in the timer pool; the node enters the ERROR state.
    TimerExhausted,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::TimerExhausted => write!(f, "timer pool exhausted"),
        }
    }
}

/// Why a register write was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// The register is read-only.
    ReadOnly,
    /// Application registers are write-protected by the node control
    /// flags. The originator gets no reply, matching legacy behaviour.
    WriteProtected,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::ReadOnly => write!(f, "register is read-only"),
            WriteError::WriteProtected => write!(f, "application registers are write-protected"),
        }
    }
}
