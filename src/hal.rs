//! Hardware Abstraction Layer
//!
//! The driver core only talks to hardware through the traits in this module,
//! which keeps the state machine and the interrupt path testable on the host.
//! The nRF51 implementations live in the submodules and are only built for
//! the target.

#[cfg(feature = "embedded")]
pub mod gpio;
#[cfg(feature = "embedded")]
pub mod radio;
#[cfg(feature = "embedded")]
pub mod rtc;

use crate::types::Timestamp;

/// Radio task that can be triggered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Ramp up the transmitter
    TxEnable,
    /// Ramp up the receiver
    RxEnable,
    /// Start sending or listening
    Start,
    /// Disable the radio
    Disable,
    /// Start an RSSI measurement
    RssiStart,
}

/// Radio event flag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Ramp-up complete, ready to start
    Ready,
    /// Address sent or matched (frame start)
    Address,
    /// Frame sent or received (frame end)
    End,
    /// Radio reached the disabled state
    Disabled,
}

/// Radio peripheral state as reported by the STATE register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HwState {
    /// Disabled, no operation ongoing
    Disabled,
    /// Receiver ramping up
    RxRampUp,
    /// Receiver ready, waiting for START
    RxIdle,
    /// Receiving
    Rx,
    /// Receiver shutting down
    RxDisable,
    /// Transmitter ramping up
    TxRampUp,
    /// Transmitter ready, waiting for START
    TxIdle,
    /// Transmitting
    Tx,
    /// Transmitter shutting down
    TxDisable,
    /// Value not defined by the reference manual
    Unknown(u8),
}

impl HwState {
    /// Decode the STATE register value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Disabled,
            1 => Self::RxRampUp,
            2 => Self::RxIdle,
            3 => Self::Rx,
            4 => Self::RxDisable,
            9 => Self::TxRampUp,
            10 => Self::TxIdle,
            11 => Self::Tx,
            12 => Self::TxDisable,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for HwState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Disabled => defmt::write!(f, "DISABLED"),
            Self::RxRampUp => defmt::write!(f, "RXRU"),
            Self::RxIdle => defmt::write!(f, "RXIDLE"),
            Self::Rx => defmt::write!(f, "RX"),
            Self::RxDisable => defmt::write!(f, "RXDISABLE"),
            Self::TxRampUp => defmt::write!(f, "TXRU"),
            Self::TxIdle => defmt::write!(f, "TXIDLE"),
            Self::Tx => defmt::write!(f, "TX"),
            Self::TxDisable => defmt::write!(f, "TXDISABLE"),
            Self::Unknown(bits) => defmt::write!(f, "STATE?{}", bits),
        }
    }
}

/// Task and event-flag access to the radio
///
/// This is all the interrupt path touches, so the interrupt handler can hold
/// its own handle next to the driver's [`RadioPeripheral`].
pub trait RadioEvents {
    /// Trigger a task
    fn trigger(&mut self, task: Task);

    /// Check whether an event flag is set
    fn is_pending(&mut self, event: Event) -> bool;

    /// Clear an event flag
    fn clear(&mut self, event: Event);
}

/// Register-level access to the 2.4 GHz radio
///
/// Implementations do no sequencing of their own; ordering of tasks and
/// event acknowledgement is the driver's job.
pub trait RadioPeripheral: RadioEvents {
    /// Program mode, packet layout, CRC, addresses, whitening, TX power and
    /// the external front-end
    fn configure(&mut self);

    /// Point the radio DMA at the packet buffer
    fn set_packet_pointer(&mut self, ptr: *const u8);

    /// Enable the frame-start and frame-end interrupts and unmask the IRQ
    fn enable_interrupts(&mut self);

    /// Switch peripheral power
    fn set_power(&mut self, on: bool);

    /// Program the frequency register (MHz above 2400)
    fn set_frequency(&mut self, index: u8);

    /// Program the data whitening initial value
    fn set_whitening_iv(&mut self, iv: u8);

    /// Current peripheral state
    fn hw_state(&self) -> HwState;

    /// Last RSSI sample (magnitude in dB, to be negated)
    fn rssi_sample(&self) -> u8;

    /// Whether the last received frame passed the hardware CRC
    fn crc_ok(&self) -> bool;
}

/// Monotonic free-running counter used for capture timestamps
pub trait Counter {
    /// Read the counter
    fn now(&self) -> Timestamp;
}

/// Single compare channel of a free-running counter
pub trait CompareHardware: Counter {
    /// Program the compare register
    fn set_compare(&mut self, value: Timestamp);

    /// Raise the compare event in software
    fn trigger_compare(&mut self);

    /// Check whether the compare event is set
    fn compare_pending(&self) -> bool;

    /// Clear the compare event
    fn clear_compare(&mut self);

    /// Enable or disable the compare interrupt
    fn set_compare_interrupt(&mut self, enabled: bool);
}

/// Visual and logic-analyzer indication of radio activity
pub trait Indicators {
    /// Radio enabled (TX ready or listening)
    fn radio_on(&mut self);

    /// Radio disabled
    fn radio_off(&mut self);
}

/// No indication at all
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIndicators;

impl Indicators for NoIndicators {
    fn radio_on(&mut self) {}

    fn radio_off(&mut self) {}
}
