//! Radio Interrupt Handler
//!
//! Services the two frame events. The timestamp is captured once on entry,
//! before any event is inspected, so both branches share one time
//! reference. Exactly one event is serviced per entry: if frame start and
//! frame end are both pending, frame start wins and the end flag stays set
//! for the next entry.
//!
//! The interrupt path does not go through [`Radio`](super::Radio). It holds
//! its own [`FrameIsr`] handle: the radio's event registers, the capture
//! counter and a shared reference to the [`FrameCallbacks`] the driver
//! registers into. The driver API therefore runs in thread mode without any
//! lock around it.
//!
//! Callbacks run in interrupt context. They must be short and must not
//! call the spin-waiting driver operations.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::hal::{Counter, Event, RadioEvents, Task};
use crate::types::{CaptureCallback, KickScheduler, Timestamp};

/// Frame event serviced by one interrupt entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameEvent {
    /// Address matched / sent at the given time
    StartOfFrame(Timestamp),
    /// Frame completed at the given time
    EndOfFrame(Timestamp),
}

impl FrameEvent {
    /// Capture timestamp of the event
    #[must_use]
    pub const fn timestamp(self) -> Timestamp {
        match self {
            Self::StartOfFrame(ts) | Self::EndOfFrame(ts) => ts,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::StartOfFrame(ts) => defmt::write!(f, "SOF@{}", ts),
            Self::EndOfFrame(ts) => defmt::write!(f, "EOF@{}", ts),
        }
    }
}

type Slot = Mutex<CriticalSectionRawMutex, Cell<Option<CaptureCallback>>>;

/// Frame-start and frame-end callback slots
///
/// Written by the driver in thread mode, read by the interrupt handler.
/// Each access copies one function pointer, so the slots can live in a
/// `static` shared by both contexts.
pub struct FrameCallbacks {
    start: Slot,
    end: Slot,
}

impl FrameCallbacks {
    /// Empty slots
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start: Mutex::new(Cell::new(None)),
            end: Mutex::new(Cell::new(None)),
        }
    }

    /// Replace the frame-start callback
    pub fn set_start(&self, cb: Option<CaptureCallback>) {
        self.start.lock(|slot| slot.set(cb));
    }

    /// Replace the frame-end callback
    pub fn set_end(&self, cb: Option<CaptureCallback>) {
        self.end.lock(|slot| slot.set(cb));
    }

    /// Current frame-start callback
    #[must_use]
    pub fn start(&self) -> Option<CaptureCallback> {
        self.start.lock(Cell::get)
    }

    /// Current frame-end callback
    #[must_use]
    pub fn end(&self) -> Option<CaptureCallback> {
        self.end.lock(Cell::get)
    }

    /// Empty both slots
    pub fn clear(&self) {
        self.set_start(None);
        self.set_end(None);
    }
}

impl Default for FrameCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side handle of the radio
pub struct FrameIsr<'a, E, C> {
    events: E,
    clock: C,
    callbacks: &'a FrameCallbacks,
}

impl<'a, E, C> FrameIsr<'a, E, C>
where
    E: RadioEvents,
    C: Counter,
{
    /// Bind the event registers, the capture counter and the callback slots
    #[must_use]
    pub const fn new(events: E, clock: C, callbacks: &'a FrameCallbacks) -> Self {
        Self {
            events,
            clock,
            callbacks,
        }
    }

    /// Interrupt entry point
    ///
    /// Returns whether the scheduler should run now.
    pub fn isr(&mut self) -> KickScheduler {
        match self.service_interrupt() {
            Some(_) => KickScheduler::Kick,
            None => KickScheduler::DoNotKick,
        }
    }

    /// Service at most one pending frame event
    ///
    /// Starts an RSSI sample on frame start, invokes the matching callback
    /// with the entry timestamp, then clears the event flag. Returns `None`
    /// if neither frame event was pending.
    pub fn service_interrupt(&mut self) -> Option<FrameEvent> {
        let timestamp = self.clock.now();

        if self.events.is_pending(Event::Address) {
            self.events.trigger(Task::RssiStart);
            if let Some(cb) = self.callbacks.start() {
                cb(timestamp);
            }
            self.events.clear(Event::Address);
            return Some(FrameEvent::StartOfFrame(timestamp));
        }

        if self.events.is_pending(Event::End) {
            if let Some(cb) = self.callbacks.end() {
                cb(timestamp);
            }
            self.events.clear(Event::End);
            return Some(FrameEvent::EndOfFrame(timestamp));
        }

        trace!("radio: spurious interrupt");
        None
    }

    /// The event registers
    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    /// The event registers, mutably
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }
}
