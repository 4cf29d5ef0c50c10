//! # Zone Index Lookup
//!
//! Some zone-aware event classes carry the zone byte at payload index 1,
//! some at index 0, and some only for certain types. This table encodes
//! where; the sub-zone always follows at the next index.

use crate::class;
use crate::types::{control, display, information, phone, remote};

/// Payload index of the zone byte for `(class, event_type)`, or `None`
/// when the event carries no zone information.
///
/// Type 0 of every class is a reserved/general event without a zone.
pub fn zone_index(class: u16, event_type: u8) -> Option<u8> {
    if event_type == 0 {
        return None;
    }

    match class {
        class::ALARM
        | class::SECURITY
        | class::ALERT_ON_LAN
        | class::MEASUREZONE
        | class::SET_VALUE_WITH_ZONE
        | class::WEATHER
        | class::WEATHER_FORECAST
        | class::DIAGNOSTIC
        | class::ERROR => Some(1),

        class::INFORMATION => {
            if event_type == information::STREAM_DATA_WITH_ZONE
                || event_type == information::CONFIRM
            {
                Some(0)
            } else if event_type != information::STREAM_DATA {
                Some(1)
            } else {
                None
            }
        }

        class::CONTROL => {
            if event_type <= control::DEACTIVATE
                || (event_type >= control::DIM_LAMP && event_type != control::STREAM_DATA)
            {
                Some(1)
            } else {
                None
            }
        }

        class::PHONE => (event_type == phone::ANSWER).then_some(1),

        class::DISPLAY => {
            (event_type != display::SET_DISPLAY_BUFFER_PARAMETER).then_some(1)
        }

        class::REMOTE => {
            (event_type == remote::VSCP_ABSTRACT || event_type == remote::MAPITO).then_some(1)
        }

        _ => None,
    }
}

/// Payload index of the sub-zone byte, directly after the zone byte.
pub fn sub_zone_index(class: u16, event_type: u8) -> Option<u8> {
    zone_index(class, event_type).map(|index| index + 1)
}
