//! Compile-time configuration.
//!
//! Queue capacity is the `N` const parameter of [`Logger`](crate::Logger); color support is
//! the `ansi-color` cargo feature. The drain interval belongs to whatever scheduler calls
//! [`Logger::drain_all`](crate::Logger::drain_all) and is only suggested here.

/// Capacity used by [`DefaultLogger`]. Must be a power of two.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Suggested period between two `drain_all` calls, in milliseconds.
pub const DRAIN_INTERVAL_MS: u32 = 10;

/// Whether events carry a color and the formatter emits ANSI escape sequences.
pub const COLOR_SUPPORT: bool = cfg!(feature = "ansi-color");

/// Logger with [`DEFAULT_QUEUE_CAPACITY`] slots.
pub type DefaultLogger = crate::Logger<DEFAULT_QUEUE_CAPACITY>;

const _: () = assert!(DEFAULT_QUEUE_CAPACITY.is_power_of_two());
