//! # Node
//!
//! The owning struct of all mutable core state, plus the lifecycle state
//! machine. Protocol event handlers live in `dispatch`, the register
//! router and extended-page-read continuation in `regio`.

use log::{debug, info, warn};
use vscp_events::{class, Priority, ProtocolType, RxEvent, TxEvent};
use vscp_events::{NICKNAME_NOT_INIT, NICKNAME_SEGMENT_MASTER};
use vscp_hal::{Application, LampState, NvMemory, Transport};
use vscp_matrix::{DecisionMatrix, RuleEngine};
use vscp_storage::{
    DeviceData, NodeControlFlags, NodeIdentity, PersistentStore, BOOT_FLAG_APPLICATION,
    SEGMENT_CRC_NOT_INIT,
};
use vscp_timer::{TimerHandle, TimerPool};

use crate::config::{CoreConfig, SECOND_MS, TIMER_POOL_SIZE};
use crate::error::CoreError;
use crate::state::{InitState, NodeState};

/// In-RAM continuation of a running extended-page read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExtPageRead {
    pub page: u16,
    pub addr: u8,
    pub count: u16,
    pub seq: u8,
}

/// A VSCP Level 1 node.
///
/// Generic over the platform seams: `T` moves event frames, `N` persists
/// bytes, `A` is the application above the core.
#[derive(Debug)]
pub struct Node<T, N, A>
where
    T: Transport,
    N: NvMemory,
    A: Application,
{
    pub(crate) bus: T,
    pub(crate) store: PersistentStore<N>,
    pub(crate) app: A,
    pub(crate) device: DeviceData,
    pub(crate) config: CoreConfig,

    pub(crate) dm: DecisionMatrix,
    pub(crate) dm_ng: RuleEngine,

    pub(crate) timers: TimerPool<TIMER_POOL_SIZE>,
    pub(crate) timer_main: Option<TimerHandle>,
    pub(crate) timer_guid_drop: Option<TimerHandle>,
    pub(crate) timer_reg162: Option<TimerHandle>,
    timer_epoch: Option<TimerHandle>,
    timer_heartbeat: Option<TimerHandle>,

    pub(crate) state: NodeState,
    pub(crate) init_state: InitState,
    pub(crate) nickname: u8,
    pub(crate) probe_nickname: u8,
    reset_seconds: u8,
    reset_requested: bool,
    pub(crate) alarm_status: u8,
    pub(crate) page_select: u16,
    pub(crate) time_since_epoch: u32,
    heartbeat_enabled: bool,
    pub(crate) guid_drop_progress: u8,
    pub(crate) ext_page_read: Option<ExtPageRead>,

    #[cfg(feature = "logger")]
    pub(crate) logger_enabled: bool,

    #[cfg(feature = "loopback")]
    loopback: vscp_events::ring::CyclicBuffer<RxEvent, 5>,
}

impl<T, N, A> Node<T, N, A>
where
    T: Transport,
    N: NvMemory,
    A: Application,
{
    /// Assemble a node. Call [`Node::init`] before anything else.
    pub fn new(bus: T, nvm: N, app: A, identity: NodeIdentity, config: CoreConfig) -> Self {
        let dm = DecisionMatrix::new(config.dm_page, config.dm_offset);
        let dm_ng = RuleEngine::new(config.dm_ng_page);
        Self {
            bus,
            store: PersistentStore::new(nvm),
            app,
            device: DeviceData::new(identity),
            config,
            dm,
            dm_ng,
            timers: TimerPool::new(),
            timer_main: None,
            timer_guid_drop: None,
            timer_reg162: None,
            timer_epoch: None,
            timer_heartbeat: None,
            state: NodeState::Startup,
            init_state: InitState::ProbeMaster,
            nickname: NICKNAME_NOT_INIT,
            probe_nickname: NICKNAME_NOT_INIT,
            reset_seconds: 0,
            reset_requested: false,
            alarm_status: 0,
            page_select: 0,
            time_since_epoch: 0,
            heartbeat_enabled: true,
            guid_drop_progress: 0,
            ext_page_read: None,
            #[cfg(feature = "logger")]
            logger_enabled: false,
            #[cfg(feature = "loopback")]
            loopback: vscp_events::ring::CyclicBuffer::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Public operations
    // -------------------------------------------------------------------------

    /// Wire up the node: application hook, timers, persisted state.
    ///
    /// Repairs an uninitialised persistent region with a factory reset.
    /// Fails only when the timer pool cannot satisfy the core, in which
    /// case the node is left in the ERROR state.
    pub fn init(&mut self) -> Result<(), CoreError> {
        self.app.init();

        self.nickname = self.store.read_nickname();
        self.state = NodeState::Startup;
        self.init_state = InitState::ProbeMaster;
        self.reset_requested = false;

        self.app.set_lamp(LampState::BlinkSlow);

        self.timer_main = self.timers.create();
        self.timer_guid_drop = self.timers.create();
        self.timer_reg162 = self.timers.create();
        self.timer_epoch = self.timers.create();
        self.timer_heartbeat = self.timers.create();

        if let Some(timer) = self.timer_epoch {
            self.timers.start(timer, SECOND_MS);
        }

        // The start-up control bits can only read 01b or 10b; anything
        // else means the persistent region was never initialised.
        let startup_control = self.startup_control();
        if startup_control != 0x01 && startup_control != 0x02 {
            warn!("persistent region uninitialised, restoring factory defaults");
            self.restore_factory_defaults();
        }

        if self.timer_main.is_none()
            || self.timer_guid_drop.is_none()
            || self.timer_reg162.is_none()
            || self.timer_epoch.is_none()
            || self.timer_heartbeat.is_none()
        {
            self.change_to_error();
            return Err(CoreError::TimerExhausted);
        }

        Ok(())
    }

    /// Restore factory default settings: registers, persistent memory and
    /// internal state.
    pub fn restore_factory_defaults(&mut self) {
        info!("restoring factory defaults");

        self.alarm_status = 0;
        self.page_select = 0;
        self.ext_page_read = None;

        self.write_nickname(NICKNAME_NOT_INIT);
        self.store.write_segment_crc(SEGMENT_CRC_NOT_INIT);
        self.store
            .write_node_control_flags(NodeControlFlags::DEFAULT.bits());
        self.store.clear_user_id();
        self.store.write_boot_flag(BOOT_FLAG_APPLICATION);
        self.store.write_log_stream_id(0);

        let Self { device, store, .. } = self;
        device.restore_defaults(store);

        DecisionMatrix::restore_defaults(&mut self.store);
        RuleEngine::restore_defaults(&mut self.store);

        self.app.restore_defaults();
    }

    /// Run one core cycle: poll the transport, advance the state machine,
    /// emit what is due. Returns whether a received event was consumed,
    /// so callers may loop for fast draining.
    pub fn process(&mut self) -> bool {
        let event = self.fetch_event();
        let handled = event.is_some();

        #[cfg(feature = "logger")]
        if let Some(ref ev) = event {
            self.handle_logger_event(ev);
        }

        // Wall clock: one second per epoch-timer expiry, master-overridable.
        if let Some(timer) = self.timer_epoch {
            if !self.timers.is_running(timer) {
                self.time_since_epoch = self.time_since_epoch.wrapping_add(1);
                self.timers.start(timer, SECOND_MS);
            }
        }

        match self.state {
            NodeState::Startup => self.state_startup(event.as_ref()),
            NodeState::Init => self.state_init(event.as_ref()),
            NodeState::PreActive => self.state_preactive(event.as_ref()),
            NodeState::Active => self.state_active(event.as_ref()),
            NodeState::Idle => {}
            NodeState::Reset => self.state_reset(),
            NodeState::Error => {}
        }

        handled
    }

    /// Advance every core timeout by `period_ms`. Call from the platform
    /// tick source.
    pub fn tick(&mut self, period_ms: u16) {
        self.timers.process(period_ms);
    }

    /// The node's nickname, 0xFF while unassigned.
    pub fn read_nickname(&self) -> u8 {
        self.nickname
    }

    /// Begin node segment initialisation (the user pressed the init
    /// button, or the application decided to re-register).
    pub fn start_node_segment_init(&mut self) {
        if self.state != NodeState::Init {
            self.change_to_init(true);
        }
    }

    /// Latch one or more alarm bits. They clear when the alarm register
    /// is read.
    pub fn set_alarm(&mut self, value: u8) {
        self.alarm_status |= value;
    }

    /// Whether the node is in the ACTIVE state.
    pub fn is_active(&self) -> bool {
        self.state == NodeState::Active
    }

    /// Current main state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Seconds since the unix epoch, as received from the segment master
    /// or counted locally.
    pub fn time_since_epoch(&self) -> u32 {
        self.time_since_epoch
    }

    /// Override the epoch time. A segment master heartbeat overwrites it
    /// again.
    pub fn set_time_since_epoch(&mut self, timestamp: u32) {
        self.time_since_epoch = timestamp;
    }

    /// Enable or disable the periodic node heartbeat.
    pub fn set_heartbeat_enabled(&mut self, enabled: bool) {
        self.heartbeat_enabled = enabled;
    }

    /// Prepare a transmit event with this node's origin and hard-coded
    /// flag. Fill in the payload afterwards.
    pub fn prepare_tx(&self, class: u16, event_type: u8, priority: Priority) -> TxEvent {
        TxEvent::new(
            class,
            event_type,
            priority,
            self.nickname,
            self.config.hard_coded,
        )
    }

    /// Send an event to the bus. Returns `false` when the transport
    /// rejected the frame.
    pub fn send_event(&mut self, event: &TxEvent) -> bool {
        let sent = self.bus.write(event);

        #[cfg(feature = "loopback")]
        if sent && !self.loopback.push(RxEvent::from(event)) {
            warn!("loopback cache full, event dropped");
        }

        sent
    }

    /// The transport, for platform use.
    pub fn bus_mut(&mut self) -> &mut T {
        &mut self.bus
    }

    /// The application hooks, for platform use.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// The persistent store, for provisioning and tests.
    pub fn store_mut(&mut self) -> &mut PersistentStore<N> {
        &mut self.store
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn fetch_event(&mut self) -> Option<RxEvent> {
        #[cfg(feature = "loopback")]
        if let Some(event) = self.loopback.pop() {
            return Some(event);
        }

        self.bus.read()
    }

    /// Persist the nickname and refresh the cached copy from storage, so
    /// the node always reports what is actually stored.
    pub(crate) fn write_nickname(&mut self, nickname: u8) {
        self.store.write_nickname(nickname);
        self.nickname = self.store.read_nickname();
    }

    pub(crate) fn startup_control(&mut self) -> u8 {
        (self.store.read_node_control_flags() >> 6) & 0x03
    }

    pub(crate) fn app_writes_enabled(&mut self) -> bool {
        (self.store.read_node_control_flags() >> 5) & 0x01 != 0
    }

    pub(crate) fn timer_running(&self, timer: Option<TimerHandle>) -> bool {
        timer.map(|t| self.timers.is_running(t)).unwrap_or(false)
    }

    pub(crate) fn timer_start(&mut self, timer: Option<TimerHandle>, value_ms: u16) {
        if let Some(t) = timer {
            self.timers.start(t, value_ms);
        }
    }

    pub(crate) fn timer_stop(&mut self, timer: Option<TimerHandle>) {
        if let Some(t) = timer {
            self.timers.stop(t);
        }
    }

    pub(crate) fn guid_byte(&mut self, index: u8) -> u8 {
        let Self { device, store, .. } = self;
        device.guid(store, index)
    }

    pub(crate) fn node_zone(&mut self) -> u8 {
        let Self { device, store, .. } = self;
        device.zone(store)
    }

    pub(crate) fn node_sub_zone(&mut self) -> u8 {
        let Self { device, store, .. } = self;
        device.sub_zone(store)
    }

    // -------------------------------------------------------------------------
    // State transitions
    // -------------------------------------------------------------------------

    pub(crate) fn change_to_init(&mut self, probe_segment_master: bool) {
        if self.state == NodeState::Init {
            return;
        }

        debug!("entering INIT, probe master: {}", probe_segment_master);
        self.app.set_lamp(LampState::BlinkFast);
        self.state = NodeState::Init;

        if probe_segment_master {
            self.init_state = InitState::ProbeMaster;
            self.probe_nickname = NICKNAME_SEGMENT_MASTER;
        } else {
            self.init_state = InitState::Probe;
            self.probe_nickname = self.config.start_probe_nickname;
        }

        self.write_nickname(NICKNAME_NOT_INIT);
    }

    fn change_to_preactive(&mut self) {
        self.state = NodeState::PreActive;
    }

    pub(crate) fn change_to_active(&mut self) {
        if self.state == NodeState::Active {
            return;
        }

        info!("node active with nickname {:#04x}", self.nickname);
        self.app.set_lamp(LampState::On);
        self.state = NodeState::Active;

        // Tell the segment a new node is online. Unlike discovery probes,
        // the announcement goes out at highest priority.
        let mut tx = self.prepare_tx(
            class::PROTOCOL,
            ProtocolType::NewNodeOnline.code(),
            Priority::Highest,
        );
        tx.set_data(&[self.nickname]);
        let _ = self.send_event(&tx);

        if cfg!(feature = "node-heartbeat") && self.heartbeat_enabled {
            self.timer_start(self.timer_heartbeat, self.config.heartbeat_period_ms);
        }
    }

    pub(crate) fn change_to_idle(&mut self) {
        if self.state == NodeState::Idle {
            return;
        }

        info!("node going idle");
        self.app.set_lamp(LampState::Off);
        self.state = NodeState::Idle;
        self.app.idle_entered();
    }

    pub(crate) fn change_to_reset(&mut self, timeout_s: u8) {
        if self.state == NodeState::Reset {
            return;
        }

        info!("reset in {} s", timeout_s);
        self.app.set_lamp(LampState::Off);
        self.state = NodeState::Reset;
        self.reset_seconds = timeout_s;

        if self.reset_seconds > 0 {
            self.timer_start(self.timer_main, SECOND_MS);
        } else {
            self.timer_stop(self.timer_main);
        }
    }

    pub(crate) fn change_to_error(&mut self) {
        if self.state == NodeState::Error {
            return;
        }

        warn!("node entering ERROR state");
        self.app.set_lamp(LampState::Off);
        self.state = NodeState::Error;
        self.app.error_entered();
    }

    // -------------------------------------------------------------------------
    // State handlers
    // -------------------------------------------------------------------------

    fn state_startup(&mut self, event: Option<&RxEvent>) {
        if self.nickname != NICKNAME_NOT_INIT {
            self.change_to_active();
            return;
        }

        if cfg!(feature = "silent-node") {
            // Stay quiet until someone addresses this node by GUID.
            if let Some(ev) = event {
                if ev.class == class::PROTOCOL
                    && ProtocolType::from(ev.event_type) == ProtocolType::ResetDevice
                {
                    self.handle_guid_drop(ev);
                }
            }
        } else if self.startup_control() == 0x01 {
            self.change_to_init(true);
        }
        // Otherwise wait for the segment initialisation button.
    }

    fn state_init(&mut self, event: Option<&RxEvent>) {
        match self.init_state {
            InitState::ProbeMaster => {
                // Probe address 0 from source 0xFF at lowest priority.
                let mut tx = self.prepare_tx(
                    class::PROTOCOL,
                    ProtocolType::NewNodeOnline.code(),
                    Priority::Low,
                );
                tx.set_data(&[NICKNAME_SEGMENT_MASTER]);

                if self.send_event(&tx) {
                    self.init_state = InitState::ProbeMasterWait;
                    self.timer_start(self.timer_main, self.config.segment_init_timeout_ms);
                }
                // On a rejected write: try again next cycle.
            }

            InitState::ProbeMasterWait => {
                if !self.timer_running(self.timer_main) {
                    // No segment master; walk the nicknames ourselves.
                    debug!("no segment master, starting self discovery");
                    self.init_state = InitState::Probe;
                    self.probe_nickname = self.config.start_probe_nickname;
                } else if let Some(ev) = event {
                    if ev.class == class::PROTOCOL
                        && ProtocolType::from(ev.event_type) == ProtocolType::ProbeAck
                        && ev.origin == NICKNAME_SEGMENT_MASTER
                    {
                        // The master answered; it will assign a nickname.
                        // The timer keeps running into PREACTIVE.
                        self.change_to_preactive();
                    }
                }
            }

            InitState::Probe => {
                let mut tx = self.prepare_tx(
                    class::PROTOCOL,
                    ProtocolType::NewNodeOnline.code(),
                    Priority::Low,
                );
                tx.set_data(&[self.probe_nickname]);

                if !self.send_event(&tx) {
                    // Try again next cycle.
                } else if self.probe_nickname == NICKNAME_NOT_INIT {
                    // Wrapped around: every nickname is taken. The 0xFF
                    // probe above told the segment this node gave up.
                    warn!("segment full, going idle");
                    self.timer_stop(self.timer_main);
                    self.change_to_idle();
                } else {
                    self.init_state = InitState::ProbeWait;
                    self.timer_start(self.timer_main, self.config.probe_ack_timeout_ms);
                }
            }

            InitState::ProbeWait => {
                if !self.timer_running(self.timer_main) {
                    // Nobody defended the nickname; it is ours.
                    self.write_nickname(self.probe_nickname);
                    self.change_to_active();
                } else if let Some(ev) = event {
                    if ev.class == class::PROTOCOL
                        && ProtocolType::from(ev.event_type) == ProtocolType::ProbeAck
                        && ev.origin == self.probe_nickname
                    {
                        self.timer_stop(self.timer_main);
                        self.probe_nickname = self.probe_nickname.wrapping_add(1);
                        self.init_state = InitState::Probe;
                    }
                }
            }
        }
    }

    fn state_preactive(&mut self, event: Option<&RxEvent>) {
        if !self.timer_running(self.timer_main) {
            // The master never assigned a nickname; discover one ourselves.
            self.change_to_init(false);
            return;
        }

        let Some(ev) = event else {
            return;
        };

        if ev.class != class::PROTOCOL {
            return;
        }

        if ProtocolType::from(ev.event_type) == ProtocolType::SetNickname
            && ev.origin == NICKNAME_SEGMENT_MASTER
            && ev.data.len() == 2
            && ev.data[0] == NICKNAME_NOT_INIT
        {
            self.timer_stop(self.timer_main);
            self.write_nickname(ev.data[1]);

            let tx = self.prepare_tx(
                class::PROTOCOL,
                ProtocolType::NicknameAccepted.code(),
                Priority::Low,
            );
            let _ = self.send_event(&tx);

            self.change_to_active();
        }
    }

    fn state_active(&mut self, event: Option<&RxEvent>) {
        if let Some(ev) = event {
            if ev.class == class::PROTOCOL {
                if !self.app.provide_protocol_event(ev) {
                    self.dispatch_protocol(ev);
                }
            } else {
                self.app.provide_event(ev);
            }

            self.run_matrices(ev);
        }

        if cfg!(feature = "node-heartbeat")
            && self.heartbeat_enabled
            && !self.timer_running(self.timer_heartbeat)
        {
            self.emit_node_heartbeat();
            self.timer_start(self.timer_heartbeat, self.config.heartbeat_period_ms);
        }

        if self.ext_page_read.is_some() {
            self.continue_extended_page_read();
        }
    }

    fn state_reset(&mut self) {
        if self.reset_requested {
            return;
        }

        if !self.timer_running(self.timer_main) {
            if self.reset_seconds > 0 {
                self.reset_seconds -= 1;
            }

            if self.reset_seconds == 0 {
                self.app.reset_request();
                self.reset_requested = true;
            } else {
                self.timer_start(self.timer_main, SECOND_MS);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Matrices and heartbeat
    // -------------------------------------------------------------------------

    fn run_matrices(&mut self, event: &RxEvent) {
        let zone = self.node_zone();
        let sub_zone = self.node_sub_zone();

        let Self {
            dm,
            dm_ng,
            store,
            app,
            ..
        } = self;

        if cfg!(feature = "dm") {
            dm.execute(store, zone, sub_zone, event, |action, param, ev| {
                app.execute_action(action, param, ev)
            });
        }

        if cfg!(feature = "dm-ng") {
            dm_ng.execute(store, event, |action, param, ev| {
                app.execute_action(action, param, ev)
            });
        }
    }

    fn emit_node_heartbeat(&mut self) {
        // The application may emit its own heartbeat shape instead.
        if self.app.node_heartbeat() {
            return;
        }

        let zone = self.node_zone();
        let sub_zone = self.node_sub_zone();

        let mut tx = self.prepare_tx(
            class::INFORMATION,
            vscp_events::types::information::NODE_HEARTBEAT,
            Priority::Low,
        );
        tx.set_data(&[0, zone, sub_zone]);
        let _ = self.send_event(&tx);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WriteError;
    use vscp_hal::ArrayNvm;

    #[derive(Debug)]
    struct NullBus;

    impl Transport for NullBus {
        fn read(&mut self) -> Option<RxEvent> {
            None
        }

        fn write(&mut self, _event: &TxEvent) -> bool {
            true
        }
    }

    #[derive(Debug, Default)]
    struct NullApp {
        lamp: Option<LampState>,
    }

    impl Application for NullApp {
        fn set_lamp(&mut self, state: LampState) {
            self.lamp = Some(state);
        }

        fn reset_request(&mut self) {}

        fn provide_event(&mut self, _event: &RxEvent) {}

        fn reg_read(&mut self, _page: u16, _addr: u8) -> u8 {
            0
        }

        fn reg_write(&mut self, _page: u16, _addr: u8, value: u8) -> u8 {
            value
        }

        fn execute_action(&mut self, _action: u8, _param: u8, _event: &RxEvent) {}
    }

    fn node() -> Node<NullBus, ArrayNvm<512>, NullApp> {
        Node::new(
            NullBus,
            ArrayNvm::new(),
            NullApp::default(),
            NodeIdentity::zeroed(),
            CoreConfig::default(),
        )
    }

    #[test]
    fn test_corrupt_persistence_forces_factory_reset() {
        // Erased memory reads 0xFF; the start-up control is neither 01b
        // nor 10b, so init must repair it.
        let mut n = node();
        n.init().unwrap();

        assert_eq!(n.store.read_node_control_flags(), 0x80);
        assert_eq!(n.store.read_nickname(), NICKNAME_NOT_INIT);
        assert!(!n.is_active());
        assert_eq!(n.app.lamp, Some(LampState::BlinkSlow));
    }

    #[test]
    fn test_startup_waits_for_manual_init_by_default() {
        let mut n = node();
        n.init().unwrap();

        // Start-up control 10b: process cycles must not start discovery.
        n.process();
        n.process();
        assert_eq!(n.state(), NodeState::Startup);

        n.start_node_segment_init();
        assert_eq!(n.state(), NodeState::Init);
    }

    #[test]
    fn test_prepare_tx_defaults() {
        let mut n = node();
        n.init().unwrap();

        let tx = n.prepare_tx(10, 6, Priority::Normal);
        assert_eq!(tx.class, 10);
        assert_eq!(tx.event_type, 6);
        assert_eq!(tx.origin, NICKNAME_NOT_INIT);
        assert!(!tx.hard_coded);
        assert!(tx.data.is_empty());
    }

    #[test]
    fn test_page_select_register_pair() {
        let mut n = node();
        n.init().unwrap();

        assert_eq!(n.write_register(0, 0x92, 0xAB), Ok(0xAB));
        assert_eq!(n.write_register(0, 0x93, 0xCD), Ok(0xCD));
        assert_eq!(n.page_select, 0xABCD);
        assert_eq!(n.read_register(0, 0x92), 0xAB);
        assert_eq!(n.read_register(0, 0x93), 0xCD);
    }

    #[test]
    fn test_alarm_register_latches() {
        let mut n = node();
        n.init().unwrap();

        n.set_alarm(0x81);
        assert_eq!(n.read_register(0, 0x80), 0x81);
        assert_eq!(n.read_register(0, 0x80), 0x00);
    }

    #[test]
    fn test_write_rejections() {
        let mut n = node();
        n.init().unwrap();

        // Read-only system register.
        assert_eq!(n.write_register(0, 0x91, 0x01), Err(WriteError::ReadOnly));
        // Application register behind the write-protect bit.
        assert_eq!(
            n.write_register(0, 0x10, 0x01),
            Err(WriteError::WriteProtected)
        );

        // Unprotect and retry.
        let flags = n.store.read_node_control_flags() | 0x20;
        n.store.write_node_control_flags(flags);
        assert_eq!(n.write_register(0, 0x10, 0x01), Ok(0x01));
    }

    #[test]
    fn test_timer_pool_covers_core_needs() {
        let mut n = node();
        assert!(n.init().is_ok());
        assert_ne!(n.state(), NodeState::Error);
    }
}
