//! Status LED and radio indicators
//!
//! The status LED shows the node state as a blink pattern driven from the
//! main loop tick. The radio indicators are the LED / debug pin pair the
//! driver raises while the radio is enabled.
//!
//! LEDs are best-effort: pin errors are ignored.

use embedded_hal::digital::OutputPin;

use crate::hal::Indicators;

/// Status LED state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

impl LedState {
    const fn from_lit(lit: bool) -> Self {
        if lit {
            Self::On
        } else {
            Self::Off
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// Blink pattern of the status LED
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedPattern {
    /// Always off
    #[default]
    Off,
    /// Always on
    On,
    /// 1 s on, 1 s off
    Blink,
    /// 500 ms on, 500 ms off
    BlinkFast,
    /// 2 s on, 2 s off
    BlinkSlow,
    /// Long-short-short over 2 s
    BlinkLss,
}

impl LedPattern {
    /// Whether the LED is lit at `tick_ms`
    #[must_use]
    pub const fn is_lit(self, tick_ms: u32) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::Blink => tick_ms % 2000 < 1000,
            Self::BlinkFast => tick_ms % 1000 < 500,
            Self::BlinkSlow => tick_ms % 4000 < 2000,
            Self::BlinkLss => {
                // on 1000, off 250, on 250, off 250, on 250
                !matches!(tick_ms % 2000, 1000..=1249 | 1500..=1749)
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LedPattern {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
            Self::Blink => defmt::write!(f, "BLINK"),
            Self::BlinkFast => defmt::write!(f, "BLINK-F"),
            Self::BlinkSlow => defmt::write!(f, "BLINK-S"),
            Self::BlinkLss => defmt::write!(f, "BLINK-LSS"),
        }
    }
}

/// Status LED driven by a blink pattern
pub struct StatusLed<P> {
    pin: P,
    pattern: LedPattern,
    state: LedState,
}

impl<P: OutputPin> StatusLed<P> {
    /// Create a new status LED (initially off)
    #[must_use]
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            pattern: LedPattern::Off,
            state: LedState::Off,
        }
    }

    /// Select the pattern; takes effect on the next `handle`
    pub fn set(&mut self, pattern: LedPattern) {
        self.pattern = pattern;
    }

    /// Switch the pattern off and the LED off right away
    pub fn clear(&mut self) {
        self.pattern = LedPattern::Off;
        self.drive(LedState::Off);
    }

    /// Drive the LED for the current tick (call periodically)
    pub fn handle(&mut self, tick_ms: u32) {
        self.drive(LedState::from_lit(self.pattern.is_lit(tick_ms)));
    }

    /// Current pattern
    #[must_use]
    pub const fn pattern(&self) -> LedPattern {
        self.pattern
    }

    /// Current LED state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }

    fn drive(&mut self, state: LedState) {
        let _ = match state {
            LedState::On => self.pin.set_high(),
            LedState::Off => self.pin.set_low(),
        };
        self.state = state;
    }
}

/// Radio LED plus radio debug pin
pub struct RadioIndicators<L, D> {
    led: L,
    debug: D,
    state: LedState,
}

impl<L: OutputPin, D: OutputPin> RadioIndicators<L, D> {
    /// Create the indicator pair (initially off)
    #[must_use]
    pub fn new(led: L, debug: D) -> Self {
        Self {
            led,
            debug,
            state: LedState::Off,
        }
    }

    /// Current indicator state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }

    /// Release the pins
    pub fn release(self) -> (L, D) {
        (self.led, self.debug)
    }
}

impl<L: OutputPin, D: OutputPin> Indicators for RadioIndicators<L, D> {
    fn radio_on(&mut self) {
        let _ = self.debug.set_high();
        let _ = self.led.set_high();
        self.state = LedState::On;
    }

    fn radio_off(&mut self) {
        let _ = self.led.set_low();
        let _ = self.debug.set_low();
        self.state = LedState::Off;
    }
}
