//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the nRF51 radio node.
//! Packet layout, on-air addressing, CRC parameters, front-end pins and
//! timer margins are centralized here.

/// Maximum frame length carried in the length prefix, in bytes
pub const MAX_PACKET_SIZE: usize = 127;

/// Size of the in-RAM packet buffer (length prefix + payload)
pub const PACKET_BUFFER_SIZE: usize = 1 + MAX_PACKET_SIZE;

/// Maximum payload the radio accepts on air (PCNF1.MAXLEN)
pub const MAX_PAYLOAD_LENGTH: u8 = 127;

/// BLE access address used as the on-air sync word
///
/// Sent as 0xD6, 0xBE, 0x89, 0x8E.
pub const BLE_ACCESS_ADDR: u32 = 0x8E89_BED6;

/// CRC24 initial value
pub const CRC_INIT_24BIT: u32 = 0x55_5555;

/// CRC24 polynomial
pub const CRC_POLY_24BIT: u32 = 0x0000_065B;

/// Inter-frame spacing in microseconds
pub const INTERFRAME_SPACING_US: u32 = 150;

/// TX output power in dBm
pub const TX_POWER_DBM: i8 = 4;

/// Priority of the RADIO interrupt (upper bits of the NVIC byte)
pub const RADIO_IRQ_PRIORITY: u8 = 0x40;

/// Priority of the RTC0 interrupt
pub const RTC_IRQ_PRIORITY: u8 = 0x80;

/// Number of ticks to set the compare ahead so the RTC will fire
pub const MINIMUM_ISR_ADVANCE: u32 = 16;

/// If a compare is late by at most this many ticks (~4 s), fire it anyway
pub const TIMERLOOP_THRESHOLD: u32 = 0x2_0000;

/// RTC0 tick frequency (LFCLK, prescaler 0)
pub const RTC_FREQUENCY_HZ: u32 = 32_768;

/// Physical channel used by the demo firmware
pub const DEFAULT_CHANNEL: u8 = 20;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin numbers matching the Crazyflie 2.x nRF51 schematic

    /// RFX2411N RX enable (also enables the PA)
    pub const PA_RX_EN: u8 = 20;

    /// RFX2411N antenna switch (set = chip antenna A)
    pub const PA_ANT_SW: u8 = 18;

    /// RFX2411N bypass mode select (clear = PA/LNA active)
    pub const PA_MODE: u8 = 19;

    /// Status LED
    pub const LED_STATUS: u8 = 13;

    /// Radio activity LED
    pub const LED_RADIO: u8 = 12;

    /// Debug pin toggled while the radio is enabled
    pub const DEBUG_RADIO: u8 = 9;

    /// Debug pin toggled while the RADIO interrupt runs
    pub const DEBUG_ISR: u8 = 10;
}
