//! Channel to frequency mapping
//!
//! Callers address channels with 802.15.4 numbers (11-26) plus the BLE
//! advertising aliases (37-39); the radio only has a BLE-style frequency
//! register holding MHz above 2400. This is the only place the two
//! numbering schemes meet.

use crate::types::Error;

/// Frequency index returned for channels with no mapping
pub const FALLBACK_FREQUENCY: u8 = 2;

/// A channel number with a physical mapping (0..=39)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    /// Highest mapped channel number
    pub const MAX: u8 = 39;

    /// Create a channel, rejecting numbers with no mapping
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownChannel`] for numbers above [`Channel::MAX`].
    pub const fn new(number: u8) -> Result<Self, Error> {
        if number <= Self::MAX {
            Ok(Self(number))
        } else {
            Err(Error::UnknownChannel(number))
        }
    }

    /// Raw channel number
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Frequency register value (MHz above 2400)
    #[must_use]
    pub const fn frequency(self) -> u8 {
        match self.0 {
            ch @ 0..=10 => 4 + 2 * ch,
            ch @ 11..=36 => 28 + 2 * (ch - 11),
            37 => 2,
            38 => 26,
            39 => 80,
            _ => FALLBACK_FREQUENCY,
        }
    }

    /// Carrier frequency in MHz
    #[must_use]
    pub const fn mhz(self) -> u16 {
        2400 + self.frequency() as u16
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Channel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ch{}", self.0);
    }
}

/// Map a channel number to the frequency register value
///
/// Channels above 39 have no mapping and yield [`FALLBACK_FREQUENCY`];
/// use [`try_channel_to_frequency`] to see the error instead.
#[must_use]
pub fn channel_to_frequency(channel: u8) -> u8 {
    match Channel::new(channel) {
        Ok(ch) => ch.frequency(),
        Err(_) => {
            warn!("channel {} unmapped, using fallback", channel);
            FALLBACK_FREQUENCY
        }
    }
}

/// Map a channel number to the frequency register value
///
/// # Errors
///
/// Returns [`Error::UnknownChannel`] for channels above 39.
pub const fn try_channel_to_frequency(channel: u8) -> Result<u8, Error> {
    match Channel::new(channel) {
        Ok(ch) => Ok(ch.frequency()),
        Err(e) => Err(e),
    }
}
