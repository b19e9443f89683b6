//! Public Driver API
//!
//! The operations the MAC layer calls. Each one moves the state machine
//! and pokes the peripheral. `rf_off`, `tx_enable` and `rx_enable` spin on a
//! hardware event with no timeout; a stuck radio hangs the caller. The
//! `*_within` variants bound the wait for callers that need it.
//!
//! There is no internal locking. The MAC layer must not load or read the
//! packet buffer while a frame is in flight, and interrupt callbacks must
//! not call back into the blocking operations.

use super::channel::channel_to_frequency;
use super::isr::FrameCallbacks;
use super::packet::{PacketBuffer, ReceivedFrame};
use super::state::RadioState;
use crate::hal::{Event, HwState, Indicators, NoIndicators, RadioPeripheral, Task};
use crate::types::{CaptureCallback, Error, FreqMode};

/// 802.15.4-style radio on the BLE PHY
///
/// Created once at firmware start and kept for the lifetime of the image.
/// The packet buffer address is handed to the radio DMA, so the driver must
/// stay at a fixed location once initialized. Frame callbacks are stored in
/// a [`FrameCallbacks`] shared with the interrupt handler.
pub struct Radio<'a, P, I = NoIndicators> {
    hw: P,
    indicators: I,
    state: RadioState,
    callbacks: &'a FrameCallbacks,
    buffer: PacketBuffer,
}

impl<'a, P> Radio<'a, P, NoIndicators>
where
    P: RadioPeripheral,
{
    /// Create a driver without radio indicators
    #[must_use]
    pub const fn new(hw: P, callbacks: &'a FrameCallbacks) -> Self {
        Self::with_indicators(hw, callbacks, NoIndicators)
    }
}

impl<'a, P, I> Radio<'a, P, I>
where
    P: RadioPeripheral,
    I: Indicators,
{
    /// Create a driver that drives the radio LED / debug pin
    #[must_use]
    pub const fn with_indicators(hw: P, callbacks: &'a FrameCallbacks, indicators: I) -> Self {
        Self {
            hw,
            indicators,
            state: RadioState::Stopped,
            callbacks,
            buffer: PacketBuffer::new(),
        }
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    /// Initialize the driver and configure the peripheral
    ///
    /// Clears the callback slots and the packet buffer, programs the PHY
    /// (mode, packet layout, CRC, address, whitening, TX power, front-end),
    /// publishes the buffer address and enables the frame-start and
    /// frame-end interrupts.
    pub fn init(&mut self) {
        self.callbacks.clear();
        self.buffer.clear();
        self.state = RadioState::Stopped;

        self.hw.configure();
        self.hw.set_packet_pointer(self.buffer.as_ptr());
        self.hw.enable_interrupts();

        debug!("radio: init");
    }

    /// Register the frame-start callback (`None` = no notification)
    pub fn set_start_frame_cb(&mut self, cb: Option<CaptureCallback>) {
        self.callbacks.set_start(cb);
    }

    /// Register the frame-end callback (`None` = no notification)
    pub fn set_end_frame_cb(&mut self, cb: Option<CaptureCallback>) {
        self.callbacks.set_end(cb);
    }

    /// Reset by power cycling the peripheral
    pub fn reset(&mut self) {
        self.hw.set_power(false);
        self.hw.set_power(true);
        self.state = RadioState::Stopped;
    }

    // ------------------------------------------------------------------
    // RF admin
    // ------------------------------------------------------------------

    /// Tune to a channel
    ///
    /// The frequency comes from the channel mapper; the whitening seed is
    /// the raw channel number. The TX/RX hint does not change what is
    /// programmed on this PHY.
    pub fn set_frequency(&mut self, channel: u8, _mode: FreqMode) {
        self.hw.set_frequency(channel_to_frequency(channel));
        self.hw.set_whitening_iv(channel);
        self.state = RadioState::FrequencySet;
    }

    /// Frequency offset of the last frame; the radio has no read-back
    #[must_use]
    pub const fn get_frequency_offset(&self) -> i8 {
        0
    }

    /// Power the peripheral on
    pub fn rf_on(&mut self) {
        self.hw.set_power(true);
        self.state = RadioState::Stopped;
        debug!("radio: rf on");
    }

    /// Disable the radio, blocking until the hardware confirms
    pub fn rf_off(&mut self) {
        self.begin_rf_off();
        self.spin_until(Event::Disabled);
        self.finish_rf_off();
    }

    /// Disable the radio, giving up after `max_polls` status reads
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the disabled event was not seen; the
    /// state stays `TurningOff`.
    pub fn rf_off_within(&mut self, max_polls: u32) -> Result<(), Error> {
        self.begin_rf_off();
        self.poll_until(Event::Disabled, max_polls)?;
        self.finish_rf_off();
        Ok(())
    }

    fn begin_rf_off(&mut self) {
        self.state = RadioState::TurningOff;
        self.hw.clear(Event::Disabled);
        self.hw.trigger(Task::Disable);
    }

    fn finish_rf_off(&mut self) {
        self.indicators.radio_off();
        self.state = RadioState::RfOff;
        trace!("radio: rf off");
    }

    // ------------------------------------------------------------------
    // TX
    // ------------------------------------------------------------------

    /// Copy a frame into the packet buffer
    ///
    /// Frames that are empty or longer than `MAX_PACKET_SIZE` are ignored:
    /// buffer, state and hardware are left untouched.
    pub fn load_packet(&mut self, packet: &[u8]) {
        if self.try_load_packet(packet).is_err() {
            warn!("radio: dropped frame of {} bytes", packet.len());
        }
    }

    /// Copy a frame into the packet buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless `1 <= packet.len() <= 127`;
    /// nothing is changed in that case.
    pub fn try_load_packet(&mut self, packet: &[u8]) -> Result<(), Error> {
        let previous = self.state;
        self.state = RadioState::LoadingPacket;

        if !self.buffer.load(packet) {
            self.state = previous;
            return Err(Error::InvalidLength(packet.len()));
        }

        // (Re)publish the DMA target
        self.hw.set_packet_pointer(self.buffer.as_ptr());

        self.state = RadioState::PacketLoaded;
        Ok(())
    }

    /// Ramp up the transmitter, blocking until it is ready
    pub fn tx_enable(&mut self) {
        self.begin_tx_enable();
        self.spin_until(Event::Ready);
        self.finish_tx_enable();
    }

    /// Ramp up the transmitter, giving up after `max_polls` status reads
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the ready event was not seen; the
    /// state stays `EnablingTx`.
    pub fn tx_enable_within(&mut self, max_polls: u32) -> Result<(), Error> {
        self.begin_tx_enable();
        self.poll_until(Event::Ready, max_polls)?;
        self.finish_tx_enable();
        Ok(())
    }

    fn begin_tx_enable(&mut self) {
        self.state = RadioState::EnablingTx;
        self.hw.clear(Event::Ready);
        self.hw.trigger(Task::TxEnable);
    }

    fn finish_tx_enable(&mut self) {
        self.indicators.radio_on();
        self.state = RadioState::TxEnabled;
        trace!("radio: tx enabled");
    }

    /// Start sending the loaded frame; does not block
    pub fn tx_now(&mut self) {
        self.hw.trigger(Task::Start);
        self.state = RadioState::Transmitting;
    }

    // ------------------------------------------------------------------
    // RX
    // ------------------------------------------------------------------

    /// Ramp up the receiver, blocking until it is ready
    ///
    /// If the radio is not already receiving it is first turned off, then
    /// the receiver is enabled. No terminal state is set after the wait:
    /// the state is left at `RfOff` by the internal turn-off, or at
    /// `EnablingRx` when the radio was already receiving.
    pub fn rx_enable(&mut self) {
        if self.begin_rx_enable() {
            self.rf_off();
            self.start_rx_ramp_up();
            self.spin_until(Event::Ready);
        }
    }

    /// Ramp up the receiver, giving up after `max_polls` status reads per
    /// wait (turn-off and ramp-up are budgeted separately)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if either hardware event was not seen.
    pub fn rx_enable_within(&mut self, max_polls: u32) -> Result<(), Error> {
        if self.begin_rx_enable() {
            self.rf_off_within(max_polls)?;
            self.start_rx_ramp_up();
            self.poll_until(Event::Ready, max_polls)?;
        }
        Ok(())
    }

    /// Returns whether the receiver still has to be ramped up
    fn begin_rx_enable(&mut self) -> bool {
        self.state = RadioState::EnablingRx;
        self.hw.hw_state() != HwState::Rx
    }

    fn start_rx_ramp_up(&mut self) {
        self.hw.set_packet_pointer(self.buffer.as_ptr());
        self.hw.clear(Event::Ready);
        self.hw.trigger(Task::RxEnable);
    }

    /// Start listening; does not block
    pub fn rx_now(&mut self) {
        self.hw.trigger(Task::Start);
        self.indicators.radio_on();
        self.state = RadioState::Listening;
    }

    /// Copy the last received frame out, at most `max_len` payload bytes
    ///
    /// Returns `None` when no frame is recorded. RSSI and the CRC flag are
    /// sampled from the hardware at read time.
    #[must_use]
    pub fn read_received_frame(&self, max_len: u8) -> Option<ReceivedFrame> {
        if self.buffer.is_empty() {
            return None;
        }
        let rssi = 0i8.wrapping_sub(self.hw.rssi_sample() as i8);
        self.buffer.read(max_len, rssi, self.hw.crc_ok())
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Current driver state
    #[must_use]
    pub const fn state(&self) -> RadioState {
        self.state
    }

    /// The packet buffer as the radio DMA sees it
    #[must_use]
    pub const fn buffer(&self) -> &PacketBuffer {
        &self.buffer
    }

    /// Mutable access to the DMA packet buffer
    ///
    /// Lets board code (or a simulated radio) deposit a received frame.
    pub fn buffer_mut(&mut self) -> &mut PacketBuffer {
        &mut self.buffer
    }

    /// The underlying peripheral
    #[must_use]
    pub const fn peripheral(&self) -> &P {
        &self.hw
    }

    /// The underlying peripheral, mutably
    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.hw
    }

    /// The radio indicators
    #[must_use]
    pub const fn indicators(&self) -> &I {
        &self.indicators
    }

    /// Release the hardware resources
    pub fn release(self) -> (P, I) {
        (self.hw, self.indicators)
    }

    fn spin_until(&mut self, event: Event) {
        while !self.hw.is_pending(event) {
            core::hint::spin_loop();
        }
    }

    fn poll_until(&mut self, event: Event, max_polls: u32) -> Result<(), Error> {
        for _ in 0..max_polls {
            if self.hw.is_pending(event) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        warn!("radio: gave up waiting after {} polls", max_polls);
        Err(Error::Timeout {
            waiting_in: self.state,
        })
    }
}
