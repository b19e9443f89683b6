//! Shared types used across the radio firmware
//!
//! Small value types that cross module boundaries: the capture timestamp,
//! the scheduler kick signal returned by interrupt handlers, the TX/RX hint
//! passed with a frequency change, and the error type of the strict API.

use core::fmt;

use crate::radio::RadioState;

/// Capture timestamp in ticks of the free-running counter
pub type Timestamp = u32;

/// Callback invoked from interrupt context with a capture timestamp
///
/// Runs with the RADIO interrupt active: it must be short, must not block
/// and must not call any of the spin-waiting driver operations.
pub type CaptureCallback = fn(Timestamp);

/// Whether the cooperative scheduler should run after an interrupt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KickScheduler {
    /// Nothing happened that the scheduler cares about
    DoNotKick,
    /// An event was handled, run the scheduler now
    Kick,
}

impl KickScheduler {
    /// Check if the scheduler should be woken
    #[must_use]
    pub const fn should_kick(self) -> bool {
        matches!(self, Self::Kick)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KickScheduler {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::DoNotKick => defmt::write!(f, "NO-KICK"),
            Self::Kick => defmt::write!(f, "KICK"),
        }
    }
}

/// Direction hint passed along with a frequency change
///
/// The BLE PHY uses the same frequency register for both directions,
/// so the hint does not change what gets programmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FreqMode {
    /// Frequency will be used to transmit
    Tx,
    /// Frequency will be used to receive
    #[default]
    Rx,
}

#[cfg(feature = "embedded")]
impl defmt::Format for FreqMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Tx => defmt::write!(f, "TX"),
            Self::Rx => defmt::write!(f, "RX"),
        }
    }
}

/// Errors reported by the strict driver variants
///
/// The default API is lenient and never returns these; see the `try_*`
/// and `*_within` operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Frame length outside `1..=MAX_PACKET_SIZE`
    InvalidLength(usize),
    /// Channel number with no physical mapping
    UnknownChannel(u8),
    /// Hardware did not confirm within the poll budget
    Timeout {
        /// State the driver was in while waiting
        waiting_in: RadioState,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "invalid frame length {len}"),
            Self::UnknownChannel(ch) => write!(f, "unknown channel {ch}"),
            Self::Timeout { waiting_in } => {
                write!(f, "radio timed out in state {waiting_in:?}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidLength(len) => defmt::write!(f, "InvalidLength({})", len),
            Self::UnknownChannel(ch) => defmt::write!(f, "UnknownChannel({})", ch),
            Self::Timeout { waiting_in } => defmt::write!(f, "Timeout({})", waiting_in),
        }
    }
}
