//! Compare Timer
//!
//! A single compare value on top of a free-running counter (RTC0 on the
//! target). Also serves as the radio's timestamp source.
//!
//! The counter cannot catch a compare that is already in the past or only a
//! few ticks ahead, so such requests are fired immediately by raising the
//! compare event in software.

use crate::config::{MINIMUM_ISR_ADVANCE, TIMERLOOP_THRESHOLD};
use crate::hal::{CompareHardware, Counter};
use crate::types::{KickScheduler, Timestamp};

/// Compare callback, invoked from the timer interrupt
pub type CompareCallback = fn();

/// What `set_compare` does with a requested value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareAction {
    /// Program the compare register
    Program(Timestamp),
    /// Target already passed (by less than the loop threshold)
    FireLate,
    /// Target too close for the hardware to catch
    FireTooClose,
}

impl CompareAction {
    /// Decide how to schedule `target` when the counter reads `now`
    ///
    /// Wrapping arithmetic: a target up to `TIMERLOOP_THRESHOLD` ticks behind
    /// `now` counts as late, anything else as ahead.
    #[must_use]
    pub const fn plan(now: Timestamp, target: Timestamp) -> Self {
        if now.wrapping_sub(target) < TIMERLOOP_THRESHOLD {
            Self::FireLate
        } else if target.wrapping_sub(now) < MINIMUM_ISR_ADVANCE {
            Self::FireTooClose
        } else {
            Self::Program(target)
        }
    }

    /// Check if the compare is fired right away
    #[must_use]
    pub const fn fires_now(self) -> bool {
        matches!(self, Self::FireLate | Self::FireTooClose)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CompareAction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Program(val) => defmt::write!(f, "CC={}", val),
            Self::FireLate => defmt::write!(f, "LATE"),
            Self::FireTooClose => defmt::write!(f, "NOW"),
        }
    }
}

/// Single-compare timer
pub struct CompareTimer<H> {
    hw: H,
    cb: Option<CompareCallback>,
}

impl<H: CompareHardware> CompareTimer<H> {
    /// Wrap the compare hardware (interrupt disabled, no callback)
    #[must_use]
    pub const fn new(hw: H) -> Self {
        Self { hw, cb: None }
    }

    /// Register the compare callback
    pub fn set_callback(&mut self, cb: Option<CompareCallback>) {
        self.cb = cb;
    }

    /// Schedule the compare interrupt at `value`
    pub fn set_compare(&mut self, value: Timestamp) -> CompareAction {
        let action = CompareAction::plan(self.hw.now(), value);
        match action {
            CompareAction::Program(val) => self.hw.set_compare(val),
            CompareAction::FireLate => {
                warn!("timer: compare {} is late", value);
                self.hw.trigger_compare();
            }
            CompareAction::FireTooClose => self.hw.trigger_compare(),
        }
        action
    }

    /// Current counter value
    #[must_use]
    pub fn read_counter(&self) -> Timestamp {
        self.hw.now()
    }

    /// Enable the compare interrupt
    pub fn enable(&mut self) {
        self.hw.set_compare_interrupt(true);
    }

    /// Disable the compare interrupt
    pub fn disable(&mut self) {
        self.hw.set_compare_interrupt(false);
    }

    /// Interrupt entry point
    pub fn isr(&mut self) -> KickScheduler {
        if !self.hw.compare_pending() {
            return KickScheduler::DoNotKick;
        }
        self.hw.clear_compare();
        if let Some(cb) = self.cb {
            cb();
        }
        KickScheduler::Kick
    }

    /// The underlying hardware
    #[must_use]
    pub const fn hardware(&self) -> &H {
        &self.hw
    }
}

impl<H: CompareHardware> Counter for CompareTimer<H> {
    fn now(&self) -> Timestamp {
        self.hw.now()
    }
}
