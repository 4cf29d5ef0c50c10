//! # Decision Matrix
//!
//! Event-to-action mapping for a VSCP node, in two flavours:
//!
//! - [`DecisionMatrix`]: the classic fixed-row filter table. Each 8-byte
//!   row masks class and type, optionally checks origin, hard-coded flag,
//!   zone and sub-zone, and names the action to fire. An optional
//!   *extension* row per standard row adds zone/sub-zone overrides and
//!   payload byte matching.
//! - [`RuleEngine`]: the byte-coded successor (DM-NG). A rule set is a
//!   count followed by variable-size rules, each a small condition program
//!   over event fields combined with AND/OR.
//!
//! Both live in persistent storage and expose their bytes through the
//! register space; evaluation happens on every received event, rows and
//! rules in ascending order, every match firing its action.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod dm;
pub mod ng;
pub mod row;

pub use dm::DecisionMatrix;
pub use ng::{RuleEngine, RuleError};
pub use row::{ExtMatchFlags, ExtRow, MatrixRow, RowFlags, ACTION_EXTENDED, ACTION_NO_OPERATION};
