//! Fixed-capacity FIFO shared between interrupt-level producers and one drain context.
//!
//! # Overview
//! - Any context may enqueue, including an interrupt handler that preempts another
//!   enqueue or the drain.
//! - Exactly one context dequeues.
//! - Producers never block: when all `N` slots are occupied the new item is dropped
//!   and counted, the oldest items are kept.
//! - `N` must be a power of two so indices wrap with a mask. This is checked when
//!   [`EventQueue::new`] is instantiated, so a bad capacity stops the build.
//!
//! # Critical section
//! Every update of the slot, the indices and the count happens inside
//! [`critical_section::with`]. The section covers one slot copy and three words of
//! bookkeeping, and is left on every path, early returns included. An observer sees
//! either the state before or after an operation, never a torn index/count pair.
//!
//! The application must provide a `critical-section` implementation (the cortex-m
//! single-core one disables interrupts, which is what this queue is written for).

use core::cell::RefCell;
use core::mem::MaybeUninit;

use critical_section::Mutex;

use crate::error::QueueFull;

struct Fifo<T: Copy, const N: usize> {
    slots: [MaybeUninit<T>; N],
    wr: usize,
    rd: usize,
    count: usize,
    dropped: u32,
}

impl<T: Copy, const N: usize> Fifo<T, N> {
    const MASK: usize = N - 1;

    const fn new() -> Self {
        const { assert!(N.is_power_of_two(), "event queue capacity must be a power of two") };
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            wr: 0,
            rd: 0,
            count: 0,
            dropped: 0,
        }
    }

    #[inline]
    fn put(&mut self, value: T) -> Result<(), QueueFull> {
        if self.count == N {
            self.dropped = self.dropped.wrapping_add(1);
            return Err(QueueFull);
        }
        self.slots[self.wr] = MaybeUninit::new(value);
        self.wr = (self.wr + 1) & Self::MASK;
        self.count += 1;
        Ok(())
    }

    #[inline]
    fn get(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        // SAFETY: the `count` slots starting at `rd` were all written by `put`.
        let value = unsafe { self.slots[self.rd].assume_init() };
        self.rd = (self.rd + 1) & Self::MASK;
        self.count -= 1;
        Some(value)
    }

    #[inline]
    fn clear(&mut self) {
        self.wr = 0;
        self.rd = 0;
        self.count = 0;
        self.dropped = 0;
    }
}

/// Bounded drop-on-full FIFO guarded by a critical section.
pub struct EventQueue<T: Copy, const N: usize> {
    fifo: Mutex<RefCell<Fifo<T, N>>>,
}

impl<T: Copy, const N: usize> EventQueue<T, N> {
    /// Create an empty queue.
    ///
    /// A capacity that is not a power of two is rejected at compile time:
    /// ```compile_fail
    /// let _queue = ph_deferlog::EventQueue::<u32, 6>::new();
    /// ```
    pub const fn new() -> Self {
        Self {
            fifo: Mutex::new(RefCell::new(Fifo::new())),
        }
    }

    #[inline]
    fn with<R>(&self, f: impl FnOnce(&mut Fifo<T, N>) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.fifo.borrow_ref_mut(cs)))
    }

    /// Insert `value` behind the newest item.
    /// Returns `false` if the queue was full and `value` was dropped.
    #[inline]
    pub fn enqueue(&self, value: T) -> bool {
        self.try_enqueue(value).is_ok()
    }

    /// Like [`enqueue`](Self::enqueue), reporting the drop as [`QueueFull`].
    #[inline]
    pub fn try_enqueue(&self, value: T) -> Result<(), QueueFull> {
        self.with(|fifo| fifo.put(value))
    }

    /// Remove and return the oldest item.
    #[inline]
    pub fn dequeue(&self) -> Option<T> {
        self.with(Fifo::get)
    }

    /// Empty the queue and zero the drop counter.
    /// Exclusive access means no producer can be mid-update.
    pub fn reset(&mut self) {
        self.fifo.get_mut().get_mut().clear();
    }

    /// Empty the queue and zero the drop counter through a shared reference.
    ///
    /// Meant for startup, before producers run. Items enqueued concurrently may be
    /// discarded together with the rest.
    pub fn clear(&self) {
        self.with(Fifo::clear);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.with(|fifo| fifo.count)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// How many items were dropped since creation or the last `reset`/`clear`.
    /// Wraps at `u32::MAX`.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.with(|fifo| fifo.dropped)
    }

    /// Reset the drop counter, returning its previous value.
    #[inline]
    pub fn reset_dropped(&self) -> u32 {
        self.with(|fifo| core::mem::take(&mut fifo.dropped))
    }

    /// Count an item discarded before it reached the queue.
    #[inline]
    pub(crate) fn count_drop(&self) {
        self.with(|fifo| fifo.dropped = fifo.dropped.wrapping_add(1));
    }
}

impl<T: Copy, const N: usize> Default for EventQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::EventQueue;
    use crate::error::QueueFull;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::vec::Vec;

    #[test]
    fn dequeue_empty_returns_none() {
        let queue = EventQueue::<u32, 4>::new();
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn dequeues_in_order() {
        let queue = EventQueue::<u32, 8>::new();
        for v in [10, 11, 12] {
            assert!(queue.enqueue(v));
        }
        assert_eq!(queue.len(), 3);

        let mut seen = Vec::new();
        while let Some(v) = queue.dequeue() {
            seen.push(v);
        }
        assert_eq!(&seen[..], &[10, 11, 12]);
    }

    #[test]
    fn wraps_around_the_mask() {
        let queue = EventQueue::<u32, 4>::new();
        for round in 0..10u32 {
            assert!(queue.enqueue(round * 2));
            assert!(queue.enqueue(round * 2 + 1));
            assert_eq!(queue.dequeue(), Some(round * 2));
            assert_eq!(queue.dequeue(), Some(round * 2 + 1));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn drops_newest_when_full() {
        let queue = EventQueue::<u32, 4>::new();
        let mut failed = 0;
        for i in 0..7 {
            if !queue.enqueue(i) {
                failed += 1;
            }
        }

        assert_eq!(failed, 3);
        assert_eq!(queue.dropped(), 3);
        assert!(queue.is_full());
        assert_eq!(queue.try_enqueue(99), Err(QueueFull));

        let mut seen = Vec::new();
        while let Some(v) = queue.dequeue() {
            seen.push(v);
        }
        assert_eq!(&seen[..], &[0, 1, 2, 3]);
        assert_eq!(queue.reset_dropped(), 4);
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn reset_empties_queue() {
        let mut queue = EventQueue::<u32, 4>::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.dequeue();
        queue.reset();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);

        queue.enqueue(5);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.enqueue(6));
        assert_eq!(queue.dequeue(), Some(6));
    }

    #[test]
    fn reset_zeroes_drop_counter() {
        let mut queue = EventQueue::<u32, 2>::new();
        queue.enqueue(1);
        queue.enqueue(2);
        assert!(!queue.enqueue(3));
        assert_eq!(queue.dropped(), 1);
        queue.reset();
        assert_eq!(queue.dropped(), 0);

        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);
        assert_eq!(queue.dropped(), 1);
        queue.clear();
        assert_eq!(queue.dropped(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn concurrent_producers_never_tear_or_duplicate() {
        const PRODUCERS: u32 = 4;
        const PER_PRODUCER: u32 = 5_000;

        let queue = EventQueue::<(u32, u32), 16>::new();
        let done = AtomicBool::new(false);

        let (received, dropped) = thread::scope(|s| {
            let consumer = s.spawn(|| {
                let mut last = [None::<u32>; PRODUCERS as usize];
                let mut received = 0u32;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    assert!(queue.len() <= queue.capacity());
                    match queue.dequeue() {
                        Some((producer, seq)) => {
                            let slot = &mut last[producer as usize];
                            if let Some(prev) = *slot {
                                assert!(seq > prev, "duplicate or reordered item");
                            }
                            *slot = Some(seq);
                            received += 1;
                        }
                        None if finished => break,
                        None => thread::yield_now(),
                    }
                }
                received
            });

            let producers: Vec<_> = (0..PRODUCERS)
                .map(|p| {
                    let queue = &queue;
                    s.spawn(move || {
                        let mut dropped = 0u32;
                        for seq in 0..PER_PRODUCER {
                            if !queue.enqueue((p, seq)) {
                                dropped += 1;
                            }
                        }
                        dropped
                    })
                })
                .collect();

            let dropped: u32 = producers.into_iter().map(|h| h.join().unwrap()).sum();
            done.store(true, Ordering::Release);
            (consumer.join().unwrap(), dropped)
        });

        assert_eq!(received + dropped, PRODUCERS * PER_PRODUCER);
        assert_eq!(queue.dropped(), dropped);
        assert!(queue.is_empty());
    }
}
