//! # Bus Logger
//!
//! Diagnostics over the bus itself: CLASS1.LOG message events carrying a
//! stream id, a level and a 32-bit value. The stream id is persisted;
//! Log Start / Log Stop events addressed to it switch emission on and
//! off. Control events are handled before the state machine runs, so
//! logging can be toggled in any lifecycle state.

use vscp_events::{class, types, Priority, RxEvent};
use vscp_hal::{Application, NvMemory, Transport};

use crate::node::Node;

/// Log levels, combinable as a bitmask.
pub mod level {
    /// Informational messages.
    pub const INFO: u8 = 0x01;
    /// Debug messages.
    pub const DEBUG: u8 = 0x02;
    /// Warnings.
    pub const WARNING: u8 = 0x04;
    /// Errors.
    pub const ERROR: u8 = 0x08;
}

impl<T, N, A> Node<T, N, A>
where
    T: Transport,
    N: NvMemory,
    A: Application,
{
    /// React to Log Start / Log Stop control events for our stream.
    pub(crate) fn handle_logger_event(&mut self, event: &RxEvent) {
        if event.class != class::LOG {
            return;
        }

        let stream_id = self.store.read_log_stream_id();
        let addressed = event.data.first().copied() == Some(stream_id);

        if !addressed {
            return;
        }

        if event.event_type == types::log::START {
            self.logger_enabled = true;
        } else if event.event_type == types::log::STOP {
            self.logger_enabled = false;
        }
    }

    /// Whether bus logging is currently switched on.
    pub fn is_logging(&self) -> bool {
        self.logger_enabled
    }

    /// Emit one log message event with `level` and `value`. Returns
    /// `false` when logging is off or the transport rejected the frame.
    pub fn log_event(&mut self, level: u8, value: u32) -> bool {
        if !self.logger_enabled {
            return false;
        }

        let stream_id = self.store.read_log_stream_id();
        let mut tx = self.prepare_tx(class::LOG, types::log::MESSAGE, Priority::Low);
        let bytes = value.to_be_bytes();
        tx.set_data(&[stream_id, level, bytes[0], bytes[1], bytes[2], bytes[3]]);
        self.send_event(&tx)
    }
}
