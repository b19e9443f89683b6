//! Packet Buffer
//!
//! One length-prefixed frame shared by load, transmit and receive. The
//! radio DMA reads the frame to send from here and writes received frames
//! back into the same bytes, so exactly one frame is in flight at a time.
//!
//! ```text
//! +--------+-------------------------------+
//! | length |  payload (length bytes)       |
//! | (1 B)  |  ... | LQI | trailing CRC ... |
//! +--------+-------------------------------+
//! ```
//!
//! The length byte is the single source of truth for how much of the
//! buffer is valid. Callers never hold a reference into the buffer; data
//! is always copied in and out.

use heapless::Vec;

use crate::config::{MAX_PACKET_SIZE, PACKET_BUFFER_SIZE};

/// Frame copied out of the packet buffer after reception
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedFrame {
    /// Payload bytes (clamped to the caller's limit)
    pub payload: Vec<u8, MAX_PACKET_SIZE>,
    /// Received signal strength in dBm
    pub rssi: i8,
    /// Link quality indicator appended by the framing
    pub lqi: u8,
    /// Hardware CRC check passed
    pub crc_ok: bool,
}

impl ReceivedFrame {
    /// Number of payload bytes copied out
    #[must_use]
    pub fn len(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Check if no payload was copied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ReceivedFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Frame({}B, {}dBm, lqi={}, crc={})",
            self.payload.len(),
            self.rssi,
            self.lqi,
            self.crc_ok
        );
    }
}

/// DMA packet buffer: length prefix followed by up to 127 payload bytes
#[repr(C, align(4))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketBuffer {
    bytes: [u8; PACKET_BUFFER_SIZE],
}

impl PacketBuffer {
    // For indexing purposes
    const LEN: usize = 0;
    const DATA: usize = 1;

    /// Create an empty buffer (length = 0)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; PACKET_BUFFER_SIZE],
        }
    }

    /// Recorded frame length, as written by `load` or by the radio
    #[must_use]
    pub const fn len(&self) -> u8 {
        self.bytes[Self::LEN]
    }

    /// Check if no frame is recorded
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Valid payload bytes according to the length prefix
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        let len = usize::from(self.len()).min(MAX_PACKET_SIZE);
        &self.bytes[Self::DATA..Self::DATA + len]
    }

    /// Copy a frame in and record its length
    ///
    /// Returns `false` and leaves the buffer untouched unless
    /// `1 <= frame.len() <= MAX_PACKET_SIZE`.
    pub fn load(&mut self, frame: &[u8]) -> bool {
        if frame.is_empty() || frame.len() > MAX_PACKET_SIZE {
            return false;
        }
        self.bytes[Self::LEN] = frame.len() as u8;
        self.bytes[Self::DATA..Self::DATA + frame.len()].copy_from_slice(frame);
        true
    }

    /// Copy out a received frame, clamped to `max_len` bytes
    ///
    /// Returns `None` when the length prefix is zero. Bytes beyond the
    /// clamp are dropped, not kept for a later read.
    #[must_use]
    pub fn read(&self, max_len: u8, rssi: i8, crc_ok: bool) -> Option<ReceivedFrame> {
        if self.is_empty() {
            return None;
        }

        let recorded = usize::from(self.len()).min(MAX_PACKET_SIZE);
        let len = recorded.min(usize::from(max_len));

        let mut payload = Vec::new();
        // Capacity is MAX_PACKET_SIZE and len never exceeds it.
        let _ = payload.extend_from_slice(&self.bytes[Self::DATA..Self::DATA + len]);

        Some(ReceivedFrame {
            payload,
            rssi,
            lqi: self.bytes[recorded - 1],
            crc_ok,
        })
    }

    /// Raw bytes including the length prefix
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PACKET_BUFFER_SIZE] {
        &self.bytes
    }

    /// Mutable raw bytes including the length prefix
    ///
    /// This is what the radio DMA writes into on reception.
    pub fn as_bytes_mut(&mut self) -> &mut [u8; PACKET_BUFFER_SIZE] {
        &mut self.bytes
    }

    /// Address handed to the radio as PACKETPTR
    #[must_use]
    pub const fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Zero the whole buffer
    pub fn clear(&mut self) {
        self.bytes = [0; PACKET_BUFFER_SIZE];
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}
