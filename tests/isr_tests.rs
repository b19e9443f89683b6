//! Radio Interrupt Tests
//!
//! Tests frame-start / frame-end dispatch, timestamp capture and the
//! callback slots shared between the driver and the interrupt handle.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test isr_tests

mod common;

use std::cell::RefCell;

use ble154_radio::hal::{Event, Task};
use ble154_radio::radio::{FrameCallbacks, FrameEvent, FrameIsr, Radio, RadioState};
use ble154_radio::types::KickScheduler;
use common::{leaked_callbacks, MockClock, MockRadio};

type TestIsr = FrameIsr<'static, MockRadio, MockClock>;

// Per-thread logs keep concurrently running tests apart
thread_local! {
    static STARTS: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
    static ENDS: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
}

fn on_start(ts: u32) {
    STARTS.with(|log| log.borrow_mut().push(ts));
}

fn on_end(ts: u32) {
    ENDS.with(|log| log.borrow_mut().push(ts));
}

fn starts() -> Vec<u32> {
    STARTS.with(|log| log.borrow().clone())
}

fn ends() -> Vec<u32> {
    ENDS.with(|log| log.borrow().clone())
}

fn clear_logs() {
    STARTS.with(|log| log.borrow_mut().clear());
    ENDS.with(|log| log.borrow_mut().clear());
}

fn isr_at(ticks: u32) -> (TestIsr, MockClock) {
    clear_logs();

    let callbacks = leaked_callbacks();
    callbacks.set_start(Some(on_start));
    callbacks.set_end(Some(on_end));

    let clock = MockClock::at(ticks);
    (FrameIsr::new(MockRadio::new(), clock.clone(), callbacks), clock)
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn start_of_frame_runs_start_callback() {
    let (mut isr, _clock) = isr_at(1234);
    isr.events_mut().raise(Event::Address);

    assert_eq!(isr.isr(), KickScheduler::Kick);
    assert_eq!(starts(), vec![1234]);
    assert!(ends().is_empty());
    assert!(!isr.events().is_raised(Event::Address));
}

#[test]
fn start_of_frame_samples_rssi() {
    let (mut isr, _clock) = isr_at(0);
    isr.events_mut().raise(Event::Address);

    isr.isr();
    assert_eq!(isr.events().tasks, vec![Task::RssiStart]);
}

#[test]
fn end_of_frame_runs_end_callback() {
    let (mut isr, _clock) = isr_at(777);
    isr.events_mut().raise(Event::End);

    assert_eq!(isr.service_interrupt(), Some(FrameEvent::EndOfFrame(777)));
    assert_eq!(ends(), vec![777]);
    assert!(starts().is_empty());
    assert!(!isr.events().is_raised(Event::End));
    assert!(isr.events().tasks.is_empty());
}

#[test]
fn start_wins_when_both_pending() {
    let (mut isr, clock) = isr_at(100);
    isr.events_mut().raise(Event::Address);
    isr.events_mut().raise(Event::End);

    assert_eq!(isr.service_interrupt(), Some(FrameEvent::StartOfFrame(100)));
    assert_eq!(starts(), vec![100]);
    assert!(ends().is_empty());
    assert!(isr.events().is_raised(Event::End));

    // Frame end is picked up on the next entry
    clock.set(180);
    assert_eq!(isr.service_interrupt(), Some(FrameEvent::EndOfFrame(180)));
    assert_eq!(ends(), vec![180]);
    assert!(!isr.events().is_raised(Event::End));
}

#[test]
fn spurious_interrupt_does_not_kick() {
    let (mut isr, _clock) = isr_at(5);

    assert_eq!(isr.isr(), KickScheduler::DoNotKick);
    assert!(starts().is_empty());
    assert!(ends().is_empty());
    assert!(isr.events().cleared.is_empty());
}

#[test]
fn missing_callbacks_still_clear_events() {
    clear_logs();
    let callbacks = FrameCallbacks::new();
    let mut isr = FrameIsr::new(MockRadio::new(), MockClock::at(0), &callbacks);
    isr.events_mut().raise(Event::Address);
    isr.events_mut().raise(Event::End);

    assert!(isr.isr().should_kick());
    assert!(isr.isr().should_kick());
    assert!(!isr.isr().should_kick());
    assert_eq!(isr.events().cleared, vec![Event::Address, Event::End]);
    assert!(starts().is_empty());
    assert!(ends().is_empty());
}

// =============================================================================
// Timestamps
// =============================================================================

#[test]
fn timestamp_captured_once_on_entry() {
    let (mut isr, clock) = isr_at(50);
    clock.auto_advance(7);
    isr.events_mut().raise(Event::End);
    let reads_before = clock.reads();

    let event = isr.service_interrupt().unwrap();
    assert_eq!(event.timestamp(), 50);
    assert_eq!(ends(), vec![50]);
    assert_eq!(clock.reads() - reads_before, 1);
}

#[test]
fn timestamp_read_even_when_nothing_pending() {
    let (mut isr, clock) = isr_at(0);
    let reads_before = clock.reads();

    isr.isr();
    assert_eq!(clock.reads() - reads_before, 1);
}

#[test]
fn timestamps_follow_counter_across_frames() {
    let (mut isr, clock) = isr_at(0xFFFF_FFF0);

    isr.events_mut().raise(Event::Address);
    isr.isr();
    clock.advance(0x20);
    isr.events_mut().raise(Event::End);
    isr.isr();

    assert_eq!(starts(), vec![0xFFFF_FFF0]);
    assert_eq!(ends(), vec![0x10]);
}

#[test]
fn frame_event_timestamp() {
    assert_eq!(FrameEvent::StartOfFrame(3).timestamp(), 3);
    assert_eq!(FrameEvent::EndOfFrame(4).timestamp(), 4);
}

// =============================================================================
// Shared callback slots
// =============================================================================

#[test]
fn driver_registration_reaches_interrupt_handle() {
    clear_logs();
    let callbacks = FrameCallbacks::new();
    let mut radio = Radio::new(MockRadio::new(), &callbacks);
    let mut isr = FrameIsr::new(MockRadio::new(), MockClock::at(42), &callbacks);

    radio.init();
    radio.set_start_frame_cb(Some(on_start));
    radio.set_end_frame_cb(Some(on_end));

    isr.events_mut().raise(Event::Address);
    isr.isr();
    isr.events_mut().raise(Event::End);
    isr.isr();

    assert_eq!(starts(), vec![42]);
    assert_eq!(ends(), vec![42]);
}

#[test]
fn interrupt_serviced_between_driver_operations() {
    clear_logs();
    let callbacks = FrameCallbacks::new();
    let mut radio = Radio::new(MockRadio::with_delay(2), &callbacks);
    let mut isr = FrameIsr::new(MockRadio::new(), MockClock::at(7), &callbacks);
    radio.init();
    radio.set_end_frame_cb(Some(on_end));

    radio.rf_on();
    radio.tx_enable();
    isr.events_mut().raise(Event::End);
    assert!(isr.isr().should_kick());
    radio.tx_now();

    assert_eq!(ends(), vec![7]);
    assert_eq!(radio.state(), RadioState::Transmitting);
}

#[test]
fn driver_init_silences_interrupt_handle() {
    clear_logs();
    let callbacks = FrameCallbacks::new();
    let mut radio = Radio::new(MockRadio::new(), &callbacks);
    let mut isr = FrameIsr::new(MockRadio::new(), MockClock::at(3), &callbacks);
    radio.set_start_frame_cb(Some(on_start));

    radio.init();
    isr.events_mut().raise(Event::Address);

    assert!(isr.isr().should_kick());
    assert!(starts().is_empty());
}

#[test]
fn replacing_callback_takes_effect() {
    clear_logs();
    let callbacks = FrameCallbacks::new();
    callbacks.set_start(Some(on_start));
    let mut isr = FrameIsr::new(MockRadio::new(), MockClock::at(9), &callbacks);

    callbacks.set_start(Some(on_end));
    isr.events_mut().raise(Event::Address);
    isr.isr();

    assert!(starts().is_empty());
    assert_eq!(ends(), vec![9]);
}
