//! RTC0 counter
//!
//! 24-bit real-time counter clocked from LFCLK. Channel CC[0] backs the
//! compare timer; the counter itself timestamps radio events.

use nrf51_pac::{Interrupt, CLOCK, RTC0};

use super::{CompareHardware, Counter};
use crate::config::RTC_IRQ_PRIORITY;
use crate::types::Timestamp;

/// RTC0 compare channel 0 interrupt enable bit
const INTEN_COMPARE0: u32 = 1 << 16;

/// RTC0 used as a free-running counter with one compare channel
pub struct Rtc0 {
    regs: RTC0,
}

impl Rtc0 {
    /// Start LFCLK and the counter (prescaler 0, 32.768 kHz)
    #[must_use]
    pub fn new(regs: RTC0, clock: &CLOCK) -> Self {
        // SAFETY: task/event registers take 0/1, PRESCALER 0 is valid
        unsafe {
            clock.events_lfclkstarted.write(|w| w.bits(0));
            clock.tasks_lfclkstart.write(|w| w.bits(1));
            while clock.events_lfclkstarted.read().bits() == 0 {}

            regs.prescaler.write(|w| w.bits(0));
            regs.tasks_start.write(|w| w.bits(1));

            let mut core = cortex_m::Peripherals::steal();
            core.NVIC.set_priority(Interrupt::RTC0, RTC_IRQ_PRIORITY);
            cortex_m::peripheral::NVIC::unmask(Interrupt::RTC0);
        }
        Self { regs }
    }
}

impl Counter for Rtc0 {
    fn now(&self) -> Timestamp {
        self.regs.counter.read().bits()
    }
}

impl CompareHardware for Rtc0 {
    fn set_compare(&mut self, value: Timestamp) {
        self.regs.cc[0].write(|w| unsafe { w.bits(value) });
    }

    fn trigger_compare(&mut self) {
        self.regs.events_compare[0].write(|w| unsafe { w.bits(1) });
    }

    fn compare_pending(&self) -> bool {
        self.regs.events_compare[0].read().bits() != 0
    }

    fn clear_compare(&mut self) {
        self.regs.events_compare[0].write(|w| unsafe { w.bits(0) });
    }

    fn set_compare_interrupt(&mut self, enabled: bool) {
        if enabled {
            self.regs.intenset.write(|w| unsafe { w.bits(INTEN_COMPARE0) });
        } else {
            self.regs.intenclr.write(|w| unsafe { w.bits(INTEN_COMPARE0) });
        }
    }
}

/// Start the high-frequency crystal, which the radio needs
pub fn start_hfclk(clock: &CLOCK) {
    // SAFETY: task/event registers take 0/1
    unsafe {
        clock.events_hfclkstarted.write(|w| w.bits(0));
        clock.tasks_hfclkstart.write(|w| w.bits(1));
    }
    while clock.events_hfclkstarted.read().bits() == 0 {}
}

/// Shared read-only view of the RTC0 counter
///
/// The radio only needs the counter value, so it gets this handle while the
/// compare timer owns [`Rtc0`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Rtc0Counter;

impl Counter for Rtc0Counter {
    fn now(&self) -> Timestamp {
        // SAFETY: COUNTER is read-only
        unsafe { (*RTC0::ptr()).counter.read().bits() }
    }
}
