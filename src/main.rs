//! Radio Node Main Application
//!
//! Entry point for the nRF51 radio node. Brings up the clocks, owns the
//! radio driver and the compare timer, wires their interrupts, and runs a
//! beacon / listen loop on one channel.
//!
//! The driver lives in thread mode and is never locked; its spin-waits run
//! with interrupts enabled. The RADIO interrupt works on its own
//! [`FrameIsr`] handle and shares only the callback slots with the driver.

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use cortex_m_rt::entry;
use defmt::{info, trace, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::OutputPin;
use heapless::Vec;
use nrf51_pac::interrupt;
use {defmt_rtt as _, panic_probe as _};

use ble154_radio::hal::gpio::Output;
use ble154_radio::hal::radio::{Nrf51Radio, Nrf51RadioEvents};
use ble154_radio::hal::rtc::{self, Rtc0, Rtc0Counter};
use ble154_radio::prelude::*;
use ble154_radio::status::{LedPattern, RadioIndicators, StatusLed};
use ble154_radio::timer::CompareTimer;

type NodeRadio = Radio<'static, Nrf51Radio, RadioIndicators<Output, Output>>;

/// Frame callbacks, registered by the driver and run by the RADIO interrupt
static CALLBACKS: FrameCallbacks = FrameCallbacks::new();

/// The compare timer, shared with the RTC0 interrupt
static TIMER: Mutex<CriticalSectionRawMutex, RefCell<Option<CompareTimer<Rtc0>>>> =
    Mutex::new(RefCell::new(None));

/// Frame events emitted by the radio callbacks, drained by the main loop
static FRAME_EVENTS: Channel<CriticalSectionRawMutex, FrameEvent, 8> = Channel::new();

/// Frame events lost to a full queue (written by the RADIO interrupt only)
static DROPPED_EVENTS: AtomicU32 = AtomicU32::new(0);

/// Set by an interrupt handler that wants the main loop to run
static KICK: AtomicBool = AtomicBool::new(false);

/// Set by the compare callback when the next beacon is due
static BEACON_DUE: AtomicBool = AtomicBool::new(false);

/// Beacon period in RTC ticks (1 s)
const BEACON_PERIOD_TICKS: u32 = RTC_FREQUENCY_HZ;

/// Beacon payload marker
const BEACON_TAG: &[u8] = b"BLE154";

/// Run `f` on the compare timer
fn with_timer<R>(f: impl FnOnce(&mut CompareTimer<Rtc0>) -> R) -> Option<R> {
    TIMER.lock(|cell| cell.borrow_mut().as_mut().map(f))
}

fn push_event(event: FrameEvent) {
    if FRAME_EVENTS.try_send(event).is_err() {
        trace!("event queue full, dropped {}", event);
        // Cortex-M0 has no fetch_add; this interrupt is the only writer
        let dropped = DROPPED_EVENTS.load(Ordering::Relaxed);
        DROPPED_EVENTS.store(dropped.wrapping_add(1), Ordering::Relaxed);
    }
}

fn on_start_frame(timestamp: Timestamp) {
    push_event(FrameEvent::StartOfFrame(timestamp));
}

fn on_end_frame(timestamp: Timestamp) {
    push_event(FrameEvent::EndOfFrame(timestamp));
}

fn on_compare() {
    BEACON_DUE.store(true, Ordering::Release);
}

/// Main entry point
#[entry]
fn main() -> ! {
    info!("BLE154 radio node v{}", env!("CARGO_PKG_VERSION"));

    let p = nrf51_pac::Peripherals::take().unwrap();

    rtc::start_hfclk(&p.CLOCK);
    let rtc = Rtc0::new(p.RTC0, &p.CLOCK);
    info!("Clocks started");

    let indicators = RadioIndicators::new(
        Output::new(pins::LED_RADIO),
        Output::new(pins::DEBUG_RADIO),
    );
    let mut status = StatusLed::new(Output::new(pins::LED_STATUS));
    let _ = Output::new(pins::DEBUG_ISR);

    // Stays in this frame for good, so the DMA address never changes
    let mut radio: NodeRadio =
        Radio::with_indicators(Nrf51Radio::new(p.RADIO), &CALLBACKS, indicators);
    radio.init();
    radio.set_start_frame_cb(Some(on_start_frame));
    radio.set_end_frame_cb(Some(on_end_frame));
    radio.rf_on();
    info!("Radio initialized");

    TIMER.lock(|cell| *cell.borrow_mut() = Some(CompareTimer::new(rtc)));
    with_timer(|timer| {
        timer.set_callback(Some(on_compare));
        timer.enable();
        let now = timer.read_counter();
        timer.set_compare(now.wrapping_add(BEACON_PERIOD_TICKS));
    });

    status.set(LedPattern::BlinkSlow);
    listen(&mut radio);

    let mut sequence: u8 = 0;
    let mut dropped_reported: u32 = 0;

    info!("Entering main loop");
    loop {
        if KICK.load(Ordering::Acquire) {
            KICK.store(false, Ordering::Release);

            while let Ok(event) = FRAME_EVENTS.try_receive() {
                handle_frame_event(&mut radio, event);
            }

            let dropped = DROPPED_EVENTS.load(Ordering::Relaxed);
            if dropped != dropped_reported {
                warn!("{} frame events dropped", dropped.wrapping_sub(dropped_reported));
                dropped_reported = dropped;
            }

            if BEACON_DUE.load(Ordering::Acquire) {
                BEACON_DUE.store(false, Ordering::Release);
                send_beacon(&mut radio, sequence);
                sequence = sequence.wrapping_add(1);
                with_timer(|timer| {
                    let now = timer.read_counter();
                    timer.set_compare(now.wrapping_add(BEACON_PERIOD_TICKS));
                });
            }
        }

        let tick_ms = Rtc0Counter.now() / (RTC_FREQUENCY_HZ / 1000);
        status.handle(tick_ms);

        if !KICK.load(Ordering::Acquire) {
            cortex_m::asm::wfi();
        }
    }
}

/// Tune to the node channel and start the receiver
fn listen(radio: &mut NodeRadio) {
    radio.set_frequency(DEFAULT_CHANNEL, FreqMode::Rx);
    radio.rx_enable();
    radio.rx_now();
}

/// Load and send one beacon frame
fn send_beacon(radio: &mut NodeRadio, sequence: u8) {
    let mut frame: Vec<u8, MAX_PACKET_SIZE> = Vec::new();
    let _ = frame.push(sequence);
    let _ = frame.extend_from_slice(BEACON_TAG);
    // Room for the LQI byte and the MAC's two CRC bytes
    let _ = frame.extend_from_slice(&[0, 0, 0]);

    radio.rf_off();
    radio.set_frequency(DEFAULT_CHANNEL, FreqMode::Tx);
    radio.load_packet(&frame);
    radio.tx_enable();
    radio.tx_now();
    info!("Beacon {} sent", sequence);
}

fn handle_frame_event(radio: &mut NodeRadio, event: FrameEvent) {
    let FrameEvent::EndOfFrame(timestamp) = event else {
        return;
    };

    match radio.state() {
        RadioState::Transmitting => listen(radio),
        RadioState::Listening => {
            let frame = radio.read_received_frame(MAX_PACKET_SIZE as u8);
            radio.rx_now();
            match frame {
                Some(frame) if frame.crc_ok => info!("RX @{}: {}", timestamp, frame),
                Some(frame) => warn!("RX @{} bad CRC: {}", timestamp, frame),
                None => warn!("RX @{}: empty frame", timestamp),
            }
        }
        other => warn!("Frame end in state {}", other),
    }
}

#[interrupt]
fn RADIO() {
    let mut isr_pin = Output::attach(pins::DEBUG_ISR);
    let _ = isr_pin.set_high();

    // SAFETY: this handler is the only place ADDRESS / END are serviced
    let events = unsafe { Nrf51RadioEvents::steal() };
    let mut frame_isr = FrameIsr::new(events, Rtc0Counter, &CALLBACKS);
    if frame_isr.isr().should_kick() {
        KICK.store(true, Ordering::Release);
    }

    let _ = isr_pin.set_low();
}

#[interrupt]
fn RTC0() {
    if with_timer(CompareTimer::isr).is_some_and(KickScheduler::should_kick) {
        KICK.store(true, Ordering::Release);
    }
}
