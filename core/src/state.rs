//! # Node States
//!
//! The main lifecycle states and the INIT sub-states of the nickname
//! discovery protocol. Transitions happen only through the `change_to_*`
//! methods on the node, which keep the lamp, timers and transient
//! per-state data in step.

/// Main lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Deciding between ACTIVE (nickname persisted) and INIT.
    Startup,
    /// Nickname discovery in progress, see [`InitState`].
    Init,
    /// Waiting for the segment master to assign a nickname.
    PreActive,
    /// Normal operation on the segment.
    Active,
    /// Offline, no event processing.
    Idle,
    /// Counting down to a platform reset request.
    Reset,
    /// Terminal error state.
    Error,
}

/// Sub-state of the INIT discovery sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// Announce to the segment master and start the wait timer.
    ProbeMaster,
    /// Wait for the master's probe acknowledge.
    ProbeMasterWait,
    /// Probe the next candidate nickname.
    Probe,
    /// Wait for someone to defend the probed nickname.
    ProbeWait,
}
