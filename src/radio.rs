//! Radio Driver
//!
//! 802.15.4-style packet radio emulated on the BLE physical layer.
//! The driver keeps an explicit state machine, a single DMA packet buffer,
//! and dispatches frame-start / frame-end interrupts to registered callbacks
//! through a separate interrupt-side handle.

pub mod channel;
pub mod driver;
pub mod isr;
pub mod packet;
pub mod state;

pub use channel::{channel_to_frequency, try_channel_to_frequency, Channel};
pub use driver::Radio;
pub use isr::{FrameCallbacks, FrameEvent, FrameIsr};
pub use packet::{PacketBuffer, ReceivedFrame};
pub use state::RadioState;
