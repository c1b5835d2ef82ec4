//! Producer and drain entry points.
//!
//! A [`Logger`] owns one [`EventQueue`] of [`LogEvent`]s. It is an ordinary value: put it in a
//! `static` for a firmware-wide log, or build independent instances in tests.
//!
//! # Lifecycle
//! 1. [`init`](Logger::init) once at startup, before any producer runs and before the drain
//!    is scheduled. Events emitted earlier are dropped and counted in
//!    [`dropped`](Logger::dropped); `init` then zeroes the counter with the rest of the queue.
//! 2. Producers call the `emit_*` family from any context, interrupt handlers included. They
//!    never block and return `false` when the event was dropped.
//! 3. One context calls [`drain_all`](Logger::drain_all) periodically (see
//!    [`DRAIN_INTERVAL_MS`](crate::config::DRAIN_INTERVAL_MS)), which formats every pending
//!    event and hands the bytes to a [`Transport`].

use crate::event::{Color, HexWidth, LogEvent};
use crate::event_queue::EventQueue;
use crate::fmt::write_event;
use crate::sync::{AtomicBool, Ordering};
use crate::transport::Transport;

/// Deferred-formatting logger with room for `N` pending events.
pub struct Logger<const N: usize> {
    queue: EventQueue<LogEvent, N>,
    ready: AtomicBool,
}

impl<const N: usize> Logger<N> {
    pub const fn new() -> Self {
        Self {
            queue: EventQueue::new(),
            ready: AtomicBool::new(false),
        }
    }

    /// Reset the queue (drop counter included) and start accepting events.
    ///
    /// Returns `false` (and does nothing) if the logger was already initialized.
    pub fn init(&self) -> bool {
        if self.ready.load(Ordering::Acquire) {
            return false;
        }
        self.queue.clear();
        self.ready
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Queue `event`. Returns `false` if it was dropped (queue full or not initialized).
    #[inline]
    pub fn emit(&self, event: LogEvent) -> bool {
        if !self.ready.load(Ordering::Acquire) {
            self.queue.count_drop();
            return false;
        }
        self.queue.enqueue(event)
    }

    #[inline]
    pub fn emit_str(&self, s: &'static str, color: Color) -> bool {
        self.emit(LogEvent::string(s, color))
    }

    #[inline]
    pub fn emit_bytes(&self, bytes: &'static [u8], color: Color) -> bool {
        self.emit(LogEvent::bytes(bytes, color))
    }

    /// Queue `len` bytes at `ptr` without copying them.
    ///
    /// # Safety
    /// Same contract as [`LogEvent::raw`]: the bytes must stay valid and unmodified until
    /// this event has been drained.
    #[inline]
    pub unsafe fn emit_raw(&self, ptr: *const u8, len: u16, color: Color) -> bool {
        // SAFETY: forwarded to the caller.
        self.emit(unsafe { LogEvent::raw(ptr, len, color) })
    }

    #[inline]
    pub fn emit_unsigned(&self, value: u32, color: Color) -> bool {
        self.emit(LogEvent::unsigned(value, color))
    }

    #[inline]
    pub fn emit_signed(&self, value: i32, color: Color) -> bool {
        self.emit(LogEvent::signed(value, color))
    }

    #[inline]
    pub fn emit_hex(&self, value: u32, width: HexWidth, color: Color) -> bool {
        self.emit(LogEvent::hex(value, width, color))
    }

    #[inline]
    pub fn emit_char(&self, c: u8, color: Color) -> bool {
        self.emit(LogEvent::char(c, color))
    }

    /// Format and transmit the oldest pending event.
    /// Returns true if there was one.
    pub fn drain_once<T: Transport + ?Sized>(&self, transport: &mut T) -> bool {
        match self.queue.dequeue() {
            Some(event) => {
                write_event(&event, transport);
                true
            }
            None => false,
        }
    }

    /// Drain at most `max` events. Returns how many were transmitted.
    pub fn drain_up_to<T: Transport + ?Sized>(&self, max: usize, transport: &mut T) -> usize {
        let mut sent = 0;
        while sent < max && self.drain_once(transport) {
            sent += 1;
        }
        sent
    }

    /// Drain until the queue is empty. Returns how many events were transmitted.
    pub fn drain_all<T: Transport + ?Sized>(&self, transport: &mut T) -> usize {
        let mut sent = 0;
        while self.drain_once(transport) {
            sent += 1;
        }
        sent
    }

    /// Events waiting to be drained.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events dropped on a full queue or before [`init`](Self::init).
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.queue.dropped()
    }

    #[inline]
    pub fn reset_dropped(&self) -> u32 {
        self.queue.reset_dropped()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for Logger<N> {
    fn default() -> Self {
        Self::new()
    }
}
