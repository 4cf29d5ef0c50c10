//! # DM-NG Rule Engine
//!
//! The byte-coded successor of the fixed-row matrix. The persisted rule
//! set is `count, (size, action, action_param, conditions...)*`; each
//! condition is `op, event_param [, sub_index], value [, value_lo]`,
//! where the op byte packs a logic operator (high nibble) chaining to the
//! *next* condition and a basic comparison (low nibble).
//!
//! Nothing in the rule set is trusted: every index is bounds-checked and a
//! rule that fails to decode yields `false` and is skipped, with the
//! position recorded for diagnostics.

use log::warn;
use vscp_events::{zone, RxEvent};
use vscp_hal::NvMemory;
use vscp_storage::layout;
use vscp_storage::PersistentStore;

/// Smallest legal rule, size byte included: size, action, parameter and
/// one minimal condition (op, event parameter, value).
pub const RULE_MIN_SIZE: u8 = 6;

/// Largest legal rule in bytes.
pub const RULE_MAX_SIZE: usize = 40;

/// Action id meaning "rule disabled".
pub const ACTION_NO_OPERATION: u8 = 0x00;

// =============================================================================
// OPERATORS
// =============================================================================

/// Logic operator chaining a condition to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogicOp {
    /// This is the final condition of the rule.
    Last,
    /// Combine with the next condition via AND.
    And,
    /// Combine with the next condition via OR.
    Or,
}

impl LogicOp {
    fn from_op_byte(op: u8) -> Result<Self, ()> {
        match op & 0xF0 {
            0x00 => Ok(LogicOp::Last),
            0x10 => Ok(LogicOp::And),
            0x20 => Ok(LogicOp::Or),
            _ => Err(()),
        }
    }
}

/// Basic comparison between an event parameter and a rule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BasicOp {
    /// Always false placeholder.
    Undefined,
    /// Equal.
    Eq,
    /// Event parameter lower than value.
    Lt,
    /// Event parameter greater than value.
    Gt,
    /// Lower or equal.
    Le,
    /// Greater or equal.
    Ge,
    /// Any bit of the value set in the event parameter.
    Mask,
}

impl BasicOp {
    fn from_op_byte(op: u8) -> Result<Self, ()> {
        match op & 0x0F {
            0 => Ok(BasicOp::Undefined),
            1 => Ok(BasicOp::Eq),
            2 => Ok(BasicOp::Lt),
            3 => Ok(BasicOp::Gt),
            4 => Ok(BasicOp::Le),
            5 => Ok(BasicOp::Ge),
            6 => Ok(BasicOp::Mask),
            _ => Err(()),
        }
    }

    fn compare(self, event_value: u16, value: u16) -> bool {
        match self {
            BasicOp::Undefined => false,
            BasicOp::Eq => event_value == value,
            BasicOp::Lt => event_value < value,
            BasicOp::Gt => event_value > value,
            BasicOp::Le => event_value <= value,
            BasicOp::Ge => event_value >= value,
            BasicOp::Mask => (event_value & value) != 0,
        }
    }
}

/// Addressable event parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventParam {
    /// Placeholder, reads as 0.
    Undefined,
    /// 16-bit event class.
    Class,
    /// Event type.
    Type,
    /// Origin nickname.
    Origin,
    /// Hard-coded flag, 0 or 1.
    HardCoded,
    /// Wire priority.
    Priority,
    /// Zone byte of the payload, 0xFF when the event has none.
    Zone,
    /// Sub-zone byte of the payload, 0xFF when the event has none.
    SubZone,
    /// Payload length.
    DataNum,
    /// Payload byte at the fixed index 0..=6.
    Data(u8),
    /// Payload byte at an index carried in the rule.
    DataIndexed,
}

impl EventParam {
    fn from_byte(id: u8) -> Result<Self, ()> {
        match id {
            0 => Ok(EventParam::Undefined),
            1 => Ok(EventParam::Class),
            2 => Ok(EventParam::Type),
            3 => Ok(EventParam::Origin),
            4 => Ok(EventParam::HardCoded),
            5 => Ok(EventParam::Priority),
            6 => Ok(EventParam::Zone),
            7 => Ok(EventParam::SubZone),
            8 => Ok(EventParam::DataNum),
            9..=15 => Ok(EventParam::Data(id - 9)),
            16 => Ok(EventParam::DataIndexed),
            _ => Err(()),
        }
    }
}

fn event_param_value(event: &RxEvent, param: EventParam, data_index: u8) -> u16 {
    let data_at = |index: u8| -> u16 {
        event
            .data
            .get(index as usize)
            .copied()
            .unwrap_or(0) as u16
    };

    match param {
        EventParam::Undefined => 0,
        EventParam::Class => event.class,
        EventParam::Type => event.event_type as u16,
        EventParam::Origin => event.origin as u16,
        EventParam::HardCoded => event.hard_coded as u16,
        EventParam::Priority => event.priority as u16,
        EventParam::Zone => match zone::zone_index(event.class, event.event_type) {
            Some(index) => data_at(index),
            None => 0xFF,
        },
        EventParam::SubZone => match zone::zone_index(event.class, event.event_type) {
            Some(index) => data_at(index + 1),
            None => 0xFF,
        },
        EventParam::DataNum => event.data.len() as u16,
        EventParam::Data(index) => data_at(index),
        EventParam::DataIndexed => data_at(data_index),
    }
}

// =============================================================================
// RULE ENGINE
// =============================================================================

/// Decode failure location, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleError {
    /// Rule number, starting at 1.
    pub rule: u8,
    /// Byte offset inside the rule where decoding stopped.
    pub offset: u8,
}

/// The DM-NG rule engine.
#[derive(Debug)]
pub struct RuleEngine {
    page: u16,
    last_error: Option<RuleError>,
}

impl RuleEngine {
    /// Create an engine whose rule set starts at register page `page`,
    /// offset 0.
    pub fn new(page: u16) -> Self {
        Self {
            page,
            last_error: None,
        }
    }

    /// Size of the rule-set region in bytes.
    pub fn region_size(&self) -> u16 {
        layout::DM_NG.size
    }

    /// Where the last failed decode stopped, if any.
    pub fn last_error(&self) -> Option<RuleError> {
        self.last_error
    }

    // -------------------------------------------------------------------------
    // Register interface
    // -------------------------------------------------------------------------

    fn byte_index(&self, page: u16, addr: u8) -> Option<u16> {
        if page < self.page {
            return None;
        }
        let index = (page - self.page) as u32 * 256 + addr as u32;
        if index < self.region_size() as u32 {
            Some(index as u16)
        } else {
            None
        }
    }

    /// Whether `(page, addr)` belongs to the rule set.
    pub fn contains(&self, page: u16, addr: u8) -> bool {
        self.region_size() > 0 && self.byte_index(page, addr).is_some()
    }

    /// Read a rule-set register.
    pub fn read_register<N: NvMemory>(
        &self,
        store: &mut PersistentStore<N>,
        page: u16,
        addr: u8,
    ) -> u8 {
        match self.byte_index(page, addr) {
            Some(index) => store.read_dm_ng(index),
            None => 0,
        }
    }

    /// Write a rule-set register and return the stored value.
    pub fn write_register<N: NvMemory>(
        &self,
        store: &mut PersistentStore<N>,
        page: u16,
        addr: u8,
        value: u8,
    ) -> u8 {
        match self.byte_index(page, addr) {
            Some(index) => {
                store.write_dm_ng(index, value);
                store.read_dm_ng(index)
            }
            None => value,
        }
    }

    /// Clear the rule set to zero.
    pub fn restore_defaults<N: NvMemory>(store: &mut PersistentStore<N>) {
        store.clear_dm_ng();
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Run every rule against `event`, firing `action` for each rule whose
    /// condition program evaluates to true.
    pub fn execute<N, F>(
        &mut self,
        store: &mut PersistentStore<N>,
        event: &RxEvent,
        mut action: F,
    ) where
        N: NvMemory,
        F: FnMut(u8, u8, &RxEvent),
    {
        let region_size = self.region_size();
        if region_size == 0 {
            return;
        }

        self.last_error = None;

        let rule_count = store.read_dm_ng(0);
        let mut cursor: u16 = 1;

        for rule_number in 1..=rule_count {
            if cursor >= region_size {
                break;
            }

            let rule_size = store.read_dm_ng(cursor);

            if rule_size as usize > RULE_MAX_SIZE
                || rule_size == 0
                || cursor + rule_size as u16 > region_size
            {
                // The cursor cannot be advanced reliably anymore.
                self.record_error(rule_number, 0);
                break;
            }

            if rule_size < RULE_MIN_SIZE {
                self.record_error(rule_number, 0);
                cursor += rule_size as u16;
                continue;
            }

            let mut rule = [0u8; RULE_MAX_SIZE];
            for offset in 0..rule_size as usize {
                rule[offset] = store.read_dm_ng(cursor + offset as u16);
            }
            cursor += rule_size as u16;

            let action_id = rule[1];
            let action_param = rule[2];

            // Conditions are only worth decoding when there is something
            // to execute.
            if action_id == ACTION_NO_OPERATION {
                continue;
            }

            match evaluate_conditions(&rule[3..rule_size as usize], event) {
                Ok(true) => action(action_id, action_param, event),
                Ok(false) => {}
                Err(part_offset) => {
                    self.record_error(rule_number, 3 + part_offset);
                }
            }
        }
    }

    fn record_error(&mut self, rule: u8, offset: u8) {
        warn!("dm-ng rule {} undecodable at byte {}", rule, offset);
        if self.last_error.is_none() {
            self.last_error = Some(RuleError { rule, offset });
        }
    }
}

/// Evaluate the condition program of one rule.
///
/// Returns the decision, or the byte offset within `part` where decoding
/// failed.
fn evaluate_conditions(part: &[u8], event: &RxEvent) -> Result<bool, u8> {
    let mut index: usize = 0;
    let mut result = false;
    let mut first_condition = true;
    let mut previous_logic = LogicOp::Last;

    loop {
        // Condition operator and event parameter id must both be present.
        if part.len() <= index + 2 {
            return Err(index as u8);
        }

        let op_byte = part[index];
        let basic = BasicOp::from_op_byte(op_byte).map_err(|_| index as u8)?;
        let logic = LogicOp::from_op_byte(op_byte).map_err(|_| index as u8)?;
        index += 1;

        let param = EventParam::from_byte(part[index]).map_err(|_| index as u8)?;
        index += 1;

        let mut data_index = 0;
        if param == EventParam::DataIndexed {
            data_index = part[index];
            index += 1;
            if part.len() <= index {
                return Err(index as u8);
            }
        }

        let event_value = event_param_value(event, param, data_index);

        let mut value = part[index] as u16;
        index += 1;

        // Class comparisons take a 16-bit value, high byte first.
        if param == EventParam::Class {
            if part.len() <= index {
                return Err(index as u8);
            }
            value = (value << 8) | part[index] as u16;
            index += 1;
        }

        let condition = basic.compare(event_value, value);

        if first_condition {
            result = condition;
            first_condition = false;
        } else {
            match previous_logic {
                LogicOp::And => result = result && condition,
                LogicOp::Or => result = result || condition,
                LogicOp::Last => return Err(index as u8),
            }
        }

        // The running result cannot change anymore; later conditions only
        // matter for their side of the combination.
        if (logic == LogicOp::And && !result) || (logic == LogicOp::Or && result) {
            break;
        }

        if logic == LogicOp::Last {
            break;
        }

        previous_logic = logic;
    }

    Ok(result)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use vscp_events::Priority;
    use vscp_hal::ArrayNvm;

    const OP_LAST_EQ: u8 = 0x01;
    const OP_AND_EQ: u8 = 0x11;
    const OP_OR_EQ: u8 = 0x21;
    const OP_LAST_GT: u8 = 0x03;

    const PARAM_CLASS: u8 = 1;
    const PARAM_TYPE: u8 = 2;
    const PARAM_DATA0: u8 = 9;
    const PARAM_DATA: u8 = 16;

    fn store_with_rules(rules: &[u8]) -> PersistentStore<ArrayNvm<512>> {
        let mut ps = PersistentStore::new(ArrayNvm::new());
        ps.clear_dm_ng();
        for (index, byte) in rules.iter().enumerate() {
            ps.write_dm_ng(index as u16, *byte);
        }
        ps
    }

    fn event(class: u16, event_type: u8, data: &[u8]) -> RxEvent {
        RxEvent {
            class,
            event_type,
            priority: Priority::Normal,
            origin: 5,
            hard_coded: false,
            data: Vec::from_slice(data).unwrap(),
        }
    }

    fn run(ps: &mut PersistentStore<ArrayNvm<512>>, ev: &RxEvent) -> std::vec::Vec<(u8, u8)> {
        let mut engine = RuleEngine::new(2);
        let mut calls = std::vec::Vec::new();
        engine.execute(ps, ev, |a, p, _| calls.push((a, p)));
        calls
    }

    #[test]
    fn test_single_condition_rule() {
        // One rule: fire action 0x10/0x01 when type == 6.
        let mut ps = store_with_rules(&[1, 6, 0x10, 0x01, OP_LAST_EQ, PARAM_TYPE, 6]);
        assert_eq!(run(&mut ps, &event(10, 6, &[])), vec![(0x10, 0x01)]);
        assert!(run(&mut ps, &event(10, 7, &[])).is_empty());
    }

    #[test]
    fn test_class_takes_16_bit_value() {
        // class == 0x01FC (508, CLASS1.ERROR)
        let mut ps = store_with_rules(&[1, 7, 0x22, 0x00, OP_LAST_EQ, PARAM_CLASS, 0x01, 0xFC]);
        assert_eq!(run(&mut ps, &event(508, 1, &[])), vec![(0x22, 0x00)]);
        assert!(run(&mut ps, &event(0x00FC, 1, &[])).is_empty());
    }

    #[test]
    fn test_and_combination() {
        // type == 6 AND data[0] > 3
        let mut ps = store_with_rules(&[
            1, 9, 0x11, 0x02, OP_AND_EQ, PARAM_TYPE, 6, OP_LAST_GT, PARAM_DATA0, 3,
        ]);
        assert_eq!(run(&mut ps, &event(10, 6, &[9])), vec![(0x11, 0x02)]);
        assert!(run(&mut ps, &event(10, 6, &[2])).is_empty());
        assert!(run(&mut ps, &event(10, 5, &[9])).is_empty());
    }

    #[test]
    fn test_or_combination_short_circuits() {
        // type == 6 OR type == 7; a type-6 event must not need the
        // second condition.
        let mut ps = store_with_rules(&[
            1, 9, 0x12, 0x00, OP_OR_EQ, PARAM_TYPE, 6, OP_LAST_EQ, PARAM_TYPE, 7,
        ]);
        assert_eq!(run(&mut ps, &event(10, 6, &[])), vec![(0x12, 0x00)]);
        assert_eq!(run(&mut ps, &event(10, 7, &[])), vec![(0x12, 0x00)]);
        assert!(run(&mut ps, &event(10, 8, &[])).is_empty());
    }

    #[test]
    fn test_indexed_data_parameter() {
        // data[5] == 0x42
        let mut ps = store_with_rules(&[1, 8, 0x13, 0x00, OP_LAST_EQ, PARAM_DATA, 5, 0x42]);
        assert_eq!(
            run(&mut ps, &event(10, 6, &[0, 0, 0, 0, 0, 0x42])),
            vec![(0x13, 0x00)]
        );
        // Out-of-bounds payload access reads as 0.
        assert!(run(&mut ps, &event(10, 6, &[1, 2])).is_empty());
    }

    #[test]
    fn test_undecodable_rule_is_skipped() {
        // Rule 1 has an illegal basic op (0x0F); rule 2 is fine.
        let mut ps = store_with_rules(&[
            2, //
            7, 0x10, 0x00, 0x0F, PARAM_TYPE, 6, 0, // broken, padded to size 7
            7, 0x20, 0x00, OP_LAST_EQ, PARAM_TYPE, 6, 0, // fires
        ]);
        let mut engine = RuleEngine::new(2);
        let mut calls = std::vec::Vec::new();
        engine.execute(&mut ps, &event(10, 6, &[]), |a, p, _| calls.push((a, p)));
        assert_eq!(calls, vec![(0x20, 0x00)]);
        let error = engine.last_error().unwrap();
        assert_eq!(error.rule, 1);
    }

    #[test]
    fn test_truncated_rule_reports_offset() {
        // Rule claims 6 bytes but the condition is cut short: op + param
        // only, no value.
        let mut ps = store_with_rules(&[1, 5, 0x10, 0x00, OP_LAST_EQ, PARAM_TYPE]);
        let mut engine = RuleEngine::new(2);
        let mut fired = false;
        engine.execute(&mut ps, &event(10, 6, &[]), |_, _, _| fired = true);
        assert!(!fired);
        assert!(engine.last_error().is_some());
    }

    #[test]
    fn test_zero_size_rule_stops_scan() {
        let mut ps = store_with_rules(&[3, 0, 0xAA, 0xBB]);
        let mut engine = RuleEngine::new(2);
        let mut fired = false;
        engine.execute(&mut ps, &event(10, 6, &[]), |_, _, _| fired = true);
        assert!(!fired);
        assert!(engine.last_error().is_some());
    }

    #[test]
    fn test_register_window() {
        let engine = RuleEngine::new(2);
        assert!(engine.contains(2, 0));
        assert!(engine.contains(2, 79));
        assert!(!engine.contains(2, 80));
        assert!(!engine.contains(1, 0));
        assert!(!engine.contains(3, 0));
    }

    #[test]
    fn test_no_op_action_skips_conditions() {
        // Action 0 with garbage conditions: no error, no call.
        let mut ps = store_with_rules(&[1, 7, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        let mut engine = RuleEngine::new(2);
        let mut fired = false;
        engine.execute(&mut ps, &event(10, 6, &[]), |_, _, _| fired = true);
        assert!(!fired);
        assert!(engine.last_error().is_none());
    }
}
