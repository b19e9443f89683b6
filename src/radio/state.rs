//! Radio State Machine
//!
//! The driver state as seen by the MAC layer above. Transitions are made
//! by the public driver operations only; the state is tracked, not enforced,
//! so calling an operation out of order is the caller's responsibility.

/// Driver state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioState {
    /// Powered, idle (after init, reset or rf on)
    #[default]
    Stopped,
    /// Frequency programmed
    FrequencySet,
    /// Disable task issued, waiting for the radio to stop
    TurningOff,
    /// Radio disabled
    RfOff,
    /// Copying a frame into the packet buffer
    LoadingPacket,
    /// Frame ready in the packet buffer
    PacketLoaded,
    /// Transmitter ramping up
    EnablingTx,
    /// Transmitter ready, waiting for `tx_now`
    TxEnabled,
    /// Frame on air
    Transmitting,
    /// Receiver ramping up
    EnablingRx,
    /// Receiver started
    Listening,
}

impl RadioState {
    /// Check if the state is a transient one inside a single operation
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            Self::TurningOff | Self::LoadingPacket | Self::EnablingTx | Self::EnablingRx
        )
    }

    /// Check if the radio is sending or about to send
    #[must_use]
    pub const fn is_tx(self) -> bool {
        matches!(self, Self::EnablingTx | Self::TxEnabled | Self::Transmitting)
    }

    /// Check if the radio is receiving or about to receive
    #[must_use]
    pub const fn is_rx(self) -> bool {
        matches!(self, Self::EnablingRx | Self::Listening)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Stopped => defmt::write!(f, "STOPPED"),
            Self::FrequencySet => defmt::write!(f, "FREQ_SET"),
            Self::TurningOff => defmt::write!(f, "TURNING_OFF"),
            Self::RfOff => defmt::write!(f, "RF_OFF"),
            Self::LoadingPacket => defmt::write!(f, "LOADING"),
            Self::PacketLoaded => defmt::write!(f, "LOADED"),
            Self::EnablingTx => defmt::write!(f, "EN_TX"),
            Self::TxEnabled => defmt::write!(f, "TX_EN"),
            Self::Transmitting => defmt::write!(f, "TX"),
            Self::EnablingRx => defmt::write!(f, "EN_RX"),
            Self::Listening => defmt::write!(f, "LISTEN"),
        }
    }
}
