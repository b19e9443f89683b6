//! BLE154 Radio Driver Library
//!
//! This library emulates an IEEE 802.15.4-style packet radio on top of the
//! Bluetooth Low Energy physical layer of the nRF51 radio peripheral. It
//! gives a MAC layer a small, state-machine-driven API (power, frequency,
//! TX/RX enable, load/send/receive a frame) and reports frame start and
//! frame end from the RADIO interrupt with precise timestamps.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  MAC / PROTOCOL STACK                        │
//! │        (calls the driver, receives frame callbacks)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     RADIO DRIVER                             │
//! │  State Machine  │  Packet Buffer  │  Channel Map  │  ISR     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  HAL TRAITS / nRF51 IMPL                     │
//! │   RADIO  │  RTC0 (timestamps, compare)  │  GPIO (LED, PA)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Single owner**: one [`radio::Radio`] per firmware image, no internal locking
//! - **Split interrupt path**: the RADIO interrupt runs a [`radio::FrameIsr`]
//!   that shares only the callback slots with the driver
//! - **Caller-serialized**: the MAC layer never touches the packet buffer
//!   while a frame is in flight
//! - **Hardware behind traits**: the core runs on the host against mocks
//! - **Lenient by default**: bad lengths are dropped, long frames clamped,
//!   unknown channels fall back; `try_*` variants report [`types::Error`]

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

#[macro_use]
mod fmt;

/// Hardware Abstraction Layer
///
/// Traits the driver talks through, plus the nRF51 implementations.
#[allow(unsafe_code)]
pub mod hal;

/// Radio Driver
///
/// State machine, packet buffer, channel mapping and interrupt handling.
pub mod radio;

/// Compare Timer
///
/// Single-compare scheduling on the free-running counter.
pub mod timer;

/// Status LED and radio indicators
pub mod status;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::hal::{Counter, Indicators, NoIndicators, RadioEvents, RadioPeripheral};
    pub use crate::radio::{
        FrameCallbacks, FrameEvent, FrameIsr, Radio, RadioState, ReceivedFrame,
    };
    pub use crate::types::*;
}
