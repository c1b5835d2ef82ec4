use core::fmt;

/// The queue already holds `N` events; the new one was discarded.
///
/// Producers normally never see this: [`EventQueue::enqueue`](crate::EventQueue::enqueue)
/// and the `Logger::emit_*` family absorb it as a silent drop. It is only returned by
/// [`EventQueue::try_enqueue`](crate::EventQueue::try_enqueue).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("log queue full, event dropped")
    }
}

impl core::error::Error for QueueFull {}
