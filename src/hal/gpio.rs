//! GPIO Abstractions
//!
//! Push-pull output pins on the nRF51 GPIO port, and the RFX2411N
//! front-end setup the radio needs before it can reach the antenna.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use nrf51_pac::GPIO;

use crate::config::pins;

fn port() -> &'static nrf51_pac::gpio::RegisterBlock {
    // SAFETY: only the atomic DIRSET/OUTSET/OUTCLR registers are written,
    // so concurrent users of different pins do not interfere
    unsafe { &*GPIO::ptr() }
}

/// A single push-pull output pin
pub struct Output {
    pin: u8,
}

impl Output {
    /// Configure `pin` as an output, initially low
    #[must_use]
    pub fn new(pin: u8) -> Self {
        let mask = 1u32 << pin;
        let gpio = port();
        gpio.outclr.write(|w| unsafe { w.bits(mask) });
        gpio.dirset.write(|w| unsafe { w.bits(mask) });
        Self { pin }
    }

    /// Handle to a pin that [`Output::new`] already configured
    ///
    /// Lets an interrupt handler drive a debug pin without sharing the
    /// original handle.
    #[must_use]
    pub const fn attach(pin: u8) -> Self {
        Self { pin }
    }

    /// Pin number
    #[must_use]
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    const fn mask(&self) -> u32 {
        1 << self.pin
    }
}

impl ErrorType for Output {
    type Error = Infallible;
}

impl OutputPin for Output {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        port().outclr.write(|w| unsafe { w.bits(self.mask()) });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        port().outset.write(|w| unsafe { w.bits(self.mask()) });
        Ok(())
    }
}

impl StatefulOutputPin for Output {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(port().out.read().bits() & self.mask() != 0)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(port().out.read().bits() & self.mask() == 0)
    }
}

/// Route the RFX2411N front-end to the chip antenna in PA/LNA mode
///
/// Power management normally does this as well, but the radio can be used
/// without it.
pub fn enable_front_end() {
    let gpio = port();
    let rx_en = 1u32 << pins::PA_RX_EN;
    let mode = 1u32 << pins::PA_MODE;
    let ant_sw = 1u32 << pins::PA_ANT_SW;

    // SAFETY: plain bit masks on the set/clear registers
    unsafe {
        gpio.dirset.write(|w| w.bits(rx_en | mode | ant_sw));

        // Enable PA
        gpio.outset.write(|w| w.bits(rx_en));
        // Chip antenna A
        gpio.outset.write(|w| w.bits(ant_sw));
        // Bypass off
        gpio.outclr.write(|w| w.bits(mode));
    }
}
