//! nRF51 RADIO peripheral
//!
//! The nRF51 radio has no 802.15.4 mode, so frames go out on the BLE 1 Mbit
//! PHY with an 8-bit length field, a 24-bit CRC and data whitening. Only the
//! packet layout lives here; the driver owns all sequencing.

use cortex_m::peripheral::NVIC;
use nrf51_pac::radio::RegisterBlock;
use nrf51_pac::{Interrupt, RADIO};

use super::gpio;
use super::{Event, HwState, RadioEvents, RadioPeripheral, Task};
use crate::config::{
    BLE_ACCESS_ADDR, CRC_INIT_24BIT, CRC_POLY_24BIT, INTERFRAME_SPACING_US, MAX_PAYLOAD_LENGTH,
    RADIO_IRQ_PRIORITY, TX_POWER_DBM,
};

/// Register field values used by `configure`
mod reg {
    pub const MODE_BLE_1MBIT: u32 = 3;

    pub const PCNF0_LFLEN_POS: u32 = 0;
    pub const PCNF0_S0LEN_POS: u32 = 8;
    pub const PCNF0_S1LEN_POS: u32 = 16;

    pub const PCNF1_MAXLEN_POS: u32 = 0;
    pub const PCNF1_STATLEN_POS: u32 = 8;
    pub const PCNF1_BALEN_POS: u32 = 16;
    pub const PCNF1_ENDIAN_POS: u32 = 24;
    pub const PCNF1_WHITEEN_POS: u32 = 25;

    pub const CRCCNF_LEN_THREE: u32 = 3;
    pub const CRCCNF_SKIPADDR_POS: u32 = 8;

    pub const INTEN_ADDRESS: u32 = 1 << 1;
    pub const INTEN_END: u32 = 1 << 3;

    pub const STATE_MASK: u32 = 0x0F;
    pub const RSSISAMPLE_MASK: u32 = 0x7F;
}

/// The RADIO register block
pub struct Nrf51Radio {
    regs: RADIO,
}

impl Nrf51Radio {
    /// Take ownership of the RADIO peripheral
    #[must_use]
    pub const fn new(regs: RADIO) -> Self {
        Self { regs }
    }

    /// Give the peripheral back
    pub fn free(self) -> RADIO {
        self.regs
    }
}

/// Task and event registers of the RADIO, for the interrupt handler
///
/// Only single-word task/event registers are touched, each of which the
/// driver and the interrupt handler use for different events.
#[derive(Clone, Copy, Debug)]
pub struct Nrf51RadioEvents {
    _private: (),
}

impl Nrf51RadioEvents {
    /// Create a handle for the RADIO interrupt handler
    ///
    /// # Safety
    ///
    /// The caller must not use the handle to service ADDRESS / END from more
    /// than one context.
    #[must_use]
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }

    fn regs(&self) -> &'static RegisterBlock {
        // SAFETY: RADIO is a fixed MMIO block; see the type docs for sharing
        unsafe { &*RADIO::ptr() }
    }
}

impl RadioEvents for Nrf51RadioEvents {
    fn trigger(&mut self, task: Task) {
        trigger_task(self.regs(), task);
    }

    fn is_pending(&mut self, event: Event) -> bool {
        event_pending(self.regs(), event)
    }

    fn clear(&mut self, event: Event) {
        clear_event(self.regs(), event);
    }
}

fn trigger_task(r: &RegisterBlock, task: Task) {
    // SAFETY: writing 1 to a task register starts the task
    unsafe {
        match task {
            Task::TxEnable => r.tasks_txen.write(|w| w.bits(1)),
            Task::RxEnable => r.tasks_rxen.write(|w| w.bits(1)),
            Task::Start => r.tasks_start.write(|w| w.bits(1)),
            Task::Disable => r.tasks_disable.write(|w| w.bits(1)),
            Task::RssiStart => r.tasks_rssistart.write(|w| w.bits(1)),
        }
    }
}

fn event_pending(r: &RegisterBlock, event: Event) -> bool {
    let bits = match event {
        Event::Ready => r.events_ready.read().bits(),
        Event::Address => r.events_address.read().bits(),
        Event::End => r.events_end.read().bits(),
        Event::Disabled => r.events_disabled.read().bits(),
    };
    bits != 0
}

fn clear_event(r: &RegisterBlock, event: Event) {
    // SAFETY: writing 0 acknowledges the event
    unsafe {
        match event {
            Event::Ready => r.events_ready.write(|w| w.bits(0)),
            Event::Address => r.events_address.write(|w| w.bits(0)),
            Event::End => r.events_end.write(|w| w.bits(0)),
            Event::Disabled => r.events_disabled.write(|w| w.bits(0)),
        }
    }
}

impl RadioEvents for Nrf51Radio {
    fn trigger(&mut self, task: Task) {
        trigger_task(&self.regs, task);
    }

    fn is_pending(&mut self, event: Event) -> bool {
        event_pending(&self.regs, event)
    }

    fn clear(&mut self, event: Event) {
        clear_event(&self.regs, event);
    }
}

impl RadioPeripheral for Nrf51Radio {
    fn configure(&mut self) {
        let r = &self.regs;

        // SAFETY: raw values below are valid field encodings for these registers
        unsafe {
            r.txpower.write(|w| w.bits(u32::from(TX_POWER_DBM as u8)));

            // S0 = 1 byte, length = 8 bits, no S1
            r.pcnf0.write(|w| {
                w.bits(
                    (8 << reg::PCNF0_LFLEN_POS)
                        | (1 << reg::PCNF0_S0LEN_POS)
                        | (0 << reg::PCNF0_S1LEN_POS),
                )
            });

            // Little endian, 3-byte base address, whitening over PDU + CRC
            r.pcnf1.write(|w| {
                w.bits(
                    (u32::from(MAX_PAYLOAD_LENGTH) << reg::PCNF1_MAXLEN_POS)
                        | (0 << reg::PCNF1_STATLEN_POS)
                        | (3 << reg::PCNF1_BALEN_POS)
                        | (0 << reg::PCNF1_ENDIAN_POS)
                        | (1 << reg::PCNF1_WHITEEN_POS),
                )
            });

            r.crcpoly.write(|w| w.bits(CRC_POLY_24BIT));
            r.crccnf
                .write(|w| w.bits(reg::CRCCNF_LEN_THREE | (1 << reg::CRCCNF_SKIPADDR_POS)));
            r.crcinit.write(|w| w.bits(CRC_INIT_24BIT));

            r.txaddress.write(|w| w.bits(0));
            r.rxaddresses.write(|w| w.bits(1));

            r.mode.write(|w| w.bits(reg::MODE_BLE_1MBIT));
            r.tifs.write(|w| w.bits(INTERFRAME_SPACING_US));

            // BASE0 transmits its upper 24 bits as the low part of the address
            r.prefix0.write(|w| w.bits((BLE_ACCESS_ADDR & 0xFF00_0000) >> 24));
            r.base0.write(|w| w.bits((BLE_ACCESS_ADDR & 0x00FF_FFFF) << 8));
        }

        gpio::enable_front_end();
    }

    fn set_packet_pointer(&mut self, ptr: *const u8) {
        // SAFETY: the pointer targets the driver's packet buffer, which lives
        // as long as the driver
        self.regs.packetptr.write(|w| unsafe { w.bits(ptr as u32) });
    }

    fn enable_interrupts(&mut self) {
        NVIC::mask(Interrupt::RADIO);

        self.regs
            .intenset
            .write(|w| unsafe { w.bits(reg::INTEN_ADDRESS | reg::INTEN_END) });

        // SAFETY: the driver is initialized before the interrupt is unmasked
        unsafe {
            let mut core = cortex_m::Peripherals::steal();
            core.NVIC.set_priority(Interrupt::RADIO, RADIO_IRQ_PRIORITY);
            NVIC::unpend(Interrupt::RADIO);
            NVIC::unmask(Interrupt::RADIO);
        }
    }

    fn set_power(&mut self, on: bool) {
        self.regs.power.write(|w| unsafe { w.bits(u32::from(on)) });
    }

    fn set_frequency(&mut self, index: u8) {
        self.regs.frequency.write(|w| unsafe { w.bits(u32::from(index)) });
    }

    fn set_whitening_iv(&mut self, iv: u8) {
        self.regs.datawhiteiv.write(|w| unsafe { w.bits(u32::from(iv)) });
    }

    fn hw_state(&self) -> HwState {
        HwState::from_bits((self.regs.state.read().bits() & reg::STATE_MASK) as u8)
    }

    fn rssi_sample(&self) -> u8 {
        (self.regs.rssisample.read().bits() & reg::RSSISAMPLE_MASK) as u8
    }

    fn crc_ok(&self) -> bool {
        self.regs.crcstatus.read().bits() == 1
    }
}
