//! Deferred-formatting logger for no-std embedded targets.
//!
//! # Highlights
//! - Producers (interrupt handlers included) queue small typed events; nothing is formatted
//!   at the call site.
//! - One drain context formats decimal, signed, hex, char and string events later and
//!   writes them to a serial [`Transport`], optionally with ANSI colors.
//! - Fixed capacity, no allocation, no blocking. A full queue drops the new event.
//!
//! # Quick start
//! ```
//! use ph_deferlog::{Color, HexWidth, Logger};
//!
//! static LOG: Logger<32> = Logger::new();
//!
//! LOG.init();
//! LOG.emit_str("id=", Color::None);
//! LOG.emit_hex(0xAB, HexWidth::Two, Color::None);
//!
//! let mut out = Vec::new();
//! LOG.drain_all(&mut |bytes: &[u8]| out.extend_from_slice(bytes));
//! assert_eq!(out, b"id=AB");
//! ```
//!
//! # No-std
//! The crate is `#![no_std]`. Tests require `std`. The application provides a
//! [`critical-section`](critical_section) implementation; on a single-core Cortex-M that is
//! the interrupt-masking one.
//!
//! # Safety and concurrency
//! Any number of contexts may emit; exactly one context may drain. String events borrow
//! their bytes: the safe API only takes `'static` data, and [`Logger::emit_raw`] leaves it
//! to the caller to keep the memory alive until it is drained.
//!
//! # Features
//! - `ansi-color` (default): events carry a [`Color`] and the drain emits SGR sequences.
//! - `log`: [`LogBridge`] backend for the `log` facade.
//! - `defmt`: `defmt::Format` for the public enums and [`QueueFull`].
//! - `portable-atomic*`: atomics for targets without compare-and-swap.
#![no_std]

pub mod config;
pub mod error;
pub mod event;
pub mod event_queue;
pub mod fmt;
#[cfg(feature = "log")]
pub mod log_bridge;
pub mod logger;
mod sync;
pub mod transport;

pub use config::DefaultLogger;
pub use error::QueueFull;
pub use event::{Color, EventKind, HexWidth, LogEvent, Record};
pub use event_queue::EventQueue;
#[cfg(feature = "log")]
pub use log_bridge::LogBridge;
pub use logger::Logger;
pub use transport::{StreamTransport, Transport};

#[cfg(test)]
extern crate std;
