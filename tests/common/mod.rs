//! Mock hardware shared by the host tests
//!
//! The mocks record what the driver asked for and simulate just enough of
//! the peripherals to let the blocking operations complete.

#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use ble154_radio::hal::{
    CompareHardware, Counter, Event, HwState, RadioEvents, RadioPeripheral, Task,
};
use ble154_radio::radio::FrameCallbacks;
use ble154_radio::types::Timestamp;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

// =============================================================================
// Radio
// =============================================================================

/// Event that becomes pending after a number of polls
#[derive(Clone, Copy, Debug)]
struct Armed {
    event: Event,
    polls_left: u32,
}

/// Simulated RADIO peripheral
///
/// Triggering TXEN/RXEN/DISABLE arms READY/DISABLED, which turn pending
/// after `completion_delay` unsuccessful polls. With `hang` set they never
/// do.
#[derive(Debug, Default)]
pub struct MockRadio {
    pub tasks: Vec<Task>,
    pub cleared: Vec<Event>,
    pub frequency: Option<u8>,
    pub whitening_iv: Option<u8>,
    pub packet_ptr: Option<*const u8>,
    pub power_writes: Vec<bool>,
    pub configure_calls: u32,
    pub interrupts_enabled: bool,
    pub state: Option<HwState>,
    pub rssi: u8,
    pub crc_ok: bool,
    pub completion_delay: u32,
    pub hang: bool,
    pub polls: u32,
    pending: Vec<Event>,
    armed: Vec<Armed>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Radio whose ramp-up / disable takes `polls` status reads
    pub fn with_delay(polls: u32) -> Self {
        Self {
            completion_delay: polls,
            ..Self::default()
        }
    }

    /// Radio that never confirms anything
    pub fn hung() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Raise an event flag as the hardware would
    pub fn raise(&mut self, event: Event) {
        if !self.pending.contains(&event) {
            self.pending.push(event);
        }
    }

    /// Whether an event flag is set, without counting a poll
    pub fn is_raised(&self, event: Event) -> bool {
        self.pending.contains(&event)
    }

    /// Forget the recorded tasks
    pub fn clear_log(&mut self) {
        self.tasks.clear();
        self.cleared.clear();
        self.polls = 0;
    }

    fn arm(&mut self, event: Event) {
        if self.hang {
            return;
        }
        self.armed.retain(|a| a.event != event);
        self.armed.push(Armed {
            event,
            polls_left: self.completion_delay,
        });
    }
}

impl RadioEvents for MockRadio {
    fn trigger(&mut self, task: Task) {
        self.tasks.push(task);
        match task {
            Task::TxEnable => {
                self.state = Some(HwState::TxIdle);
                self.arm(Event::Ready);
            }
            Task::RxEnable => {
                self.state = Some(HwState::RxIdle);
                self.arm(Event::Ready);
            }
            Task::Disable => {
                self.state = Some(HwState::Disabled);
                self.arm(Event::Disabled);
            }
            Task::Start => {
                self.state = match self.state {
                    Some(HwState::TxIdle) => Some(HwState::Tx),
                    Some(HwState::RxIdle) => Some(HwState::Rx),
                    other => other,
                };
            }
            Task::RssiStart => {}
        }
    }

    fn is_pending(&mut self, event: Event) -> bool {
        self.polls += 1;
        if self.pending.contains(&event) {
            return true;
        }
        let Some(idx) = self.armed.iter().position(|a| a.event == event) else {
            return false;
        };
        if self.armed[idx].polls_left == 0 {
            self.armed.remove(idx);
            self.pending.push(event);
            true
        } else {
            self.armed[idx].polls_left -= 1;
            false
        }
    }

    fn clear(&mut self, event: Event) {
        self.cleared.push(event);
        self.pending.retain(|e| *e != event);
    }
}

impl RadioPeripheral for MockRadio {
    fn configure(&mut self) {
        self.configure_calls += 1;
    }

    fn set_packet_pointer(&mut self, ptr: *const u8) {
        self.packet_ptr = Some(ptr);
    }

    fn enable_interrupts(&mut self) {
        self.interrupts_enabled = true;
    }

    fn set_power(&mut self, on: bool) {
        self.power_writes.push(on);
    }

    fn set_frequency(&mut self, index: u8) {
        self.frequency = Some(index);
    }

    fn set_whitening_iv(&mut self, iv: u8) {
        self.whitening_iv = Some(iv);
    }

    fn hw_state(&self) -> HwState {
        self.state.unwrap_or(HwState::Disabled)
    }

    fn rssi_sample(&self) -> u8 {
        self.rssi
    }

    fn crc_ok(&self) -> bool {
        self.crc_ok
    }
}

// =============================================================================
// Counter
// =============================================================================

/// Free-running counter the test controls
///
/// Clones share the same counter, so a test can keep a handle after moving
/// one into the driver.
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    ticks: Rc<Cell<Timestamp>>,
    step: Rc<Cell<Timestamp>>,
    reads: Rc<Cell<u32>>,
}

impl MockClock {
    pub fn at(ticks: Timestamp) -> Self {
        let clock = Self::default();
        clock.set(ticks);
        clock
    }

    pub fn set(&self, ticks: Timestamp) {
        self.ticks.set(ticks);
    }

    pub fn advance(&self, ticks: Timestamp) {
        self.ticks.set(self.ticks.get().wrapping_add(ticks));
    }

    /// Advance by `step` after every read
    pub fn auto_advance(&self, step: Timestamp) {
        self.step.set(step);
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl Counter for MockClock {
    fn now(&self) -> Timestamp {
        let now = self.ticks.get();
        self.reads.set(self.reads.get() + 1);
        self.ticks.set(now.wrapping_add(self.step.get()));
        now
    }
}

// =============================================================================
// Compare channel
// =============================================================================

/// Compare channel on top of a [`MockClock`]
#[derive(Clone, Debug, Default)]
pub struct MockCompare {
    pub clock: MockClock,
    compare: Rc<Cell<Option<Timestamp>>>,
    pending: Rc<Cell<bool>>,
    triggers: Rc<Cell<u32>>,
    interrupt: Rc<Cell<bool>>,
}

impl MockCompare {
    pub fn at(ticks: Timestamp) -> Self {
        Self {
            clock: MockClock::at(ticks),
            ..Self::default()
        }
    }

    pub fn compare(&self) -> Option<Timestamp> {
        self.compare.get()
    }

    pub fn software_triggers(&self) -> u32 {
        self.triggers.get()
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.interrupt.get()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Simulate the counter reaching the compare value
    pub fn fire(&self) {
        self.pending.set(true);
    }
}

impl Counter for MockCompare {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

impl CompareHardware for MockCompare {
    fn set_compare(&mut self, value: Timestamp) {
        self.compare.set(Some(value));
    }

    fn trigger_compare(&mut self) {
        self.triggers.set(self.triggers.get() + 1);
        self.pending.set(true);
    }

    fn compare_pending(&self) -> bool {
        self.pending.get()
    }

    fn clear_compare(&mut self) {
        self.pending.set(false);
    }

    fn set_compare_interrupt(&mut self, enabled: bool) {
        self.interrupt.set(enabled);
    }
}

// =============================================================================
// Pins
// =============================================================================

/// Output pin whose level the test can observe through a clone
#[derive(Clone, Debug, Default)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.level.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Output pin that fails every write
#[derive(Clone, Copy, Debug, Default)]
pub struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

// =============================================================================
// Callback slots
// =============================================================================

/// Callback slots that outlive the test, like the firmware's `static`
pub fn leaked_callbacks() -> &'static FrameCallbacks {
    Box::leak(Box::new(FrameCallbacks::new()))
}
