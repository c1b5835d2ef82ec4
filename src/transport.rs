//! Output side of the drain.
//!
//! The formatter hands finished byte runs to a [`Transport`]; what happens next (UART, USB CDC,
//! RTT, a test buffer) is up to the implementation. Calls are fire-and-forget: the transport
//! does its own buffering and must not block indefinitely.

/// Sink for formatted log bytes.
pub trait Transport {
    fn transmit(&mut self, bytes: &[u8]);
}

impl<F: FnMut(&[u8])> Transport for F {
    #[inline]
    fn transmit(&mut self, bytes: &[u8]) {
        self(bytes)
    }
}

/// Bounded byte stream between the drain and a serial writer task.
///
/// `transmit` never waits: bytes that do not fit are discarded and counted. The writer side
/// pulls them out with [`read`](Self::read) and pushes them to the hardware at its own pace.
pub struct StreamTransport<const CAP: usize> {
    buf: [u8; CAP],
    head: usize,
    len: usize,
    discarded: usize,
}

impl<const CAP: usize> StreamTransport<CAP> {
    /// Create an empty stream. A zero capacity is rejected at compile time:
    /// ```compile_fail
    /// let _stream = ph_deferlog::StreamTransport::<0>::new();
    /// ```
    pub const fn new() -> Self {
        const { assert!(CAP > 0, "stream capacity must be non-zero") };
        Self {
            buf: [0; CAP],
            head: 0,
            len: 0,
            discarded: 0,
        }
    }

    /// Bytes waiting to be read.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free space left for `transmit`.
    #[inline]
    pub fn available(&self) -> usize {
        CAP - self.len
    }

    /// Bytes thrown away because the stream was full.
    #[inline]
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Move up to `out.len()` pending bytes into `out`, oldest first.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.len);
        for (i, b) in out[..n].iter_mut().enumerate() {
            *b = self.buf[(self.head + i) % CAP];
        }
        self.head = (self.head + n) % CAP;
        self.len -= n;
        n
    }
}

impl<const CAP: usize> Default for StreamTransport<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> Transport for StreamTransport<CAP> {
    fn transmit(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.available());
        let tail = self.head + self.len;
        for (i, b) in bytes[..n].iter().enumerate() {
            self.buf[(tail + i) % CAP] = *b;
        }
        self.len += n;
        self.discarded += bytes.len() - n;
    }
}

#[cfg(test)]
mod tests {
    use super::{StreamTransport, Transport};
    use std::vec::Vec;

    #[test]
    fn closures_are_transports() {
        let mut out = Vec::new();
        let mut sink = |b: &[u8]| out.extend_from_slice(b);
        sink.transmit(b"ab");
        sink.transmit(b"c");
        assert_eq!(&out[..], b"abc");
    }

    #[test]
    fn stream_discards_overflow() {
        let mut stream = StreamTransport::<4>::new();
        stream.transmit(b"abc");
        stream.transmit(b"def");
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.discarded(), 2);

        let mut out = [0u8; 8];
        let n = stream.read(&mut out);
        assert_eq!(&out[..n], b"abcd");
        assert!(stream.is_empty());
    }

    #[test]
    fn stream_wraps() {
        let mut stream = StreamTransport::<4>::new();
        let mut out = [0u8; 2];
        stream.transmit(b"abc");
        assert_eq!(stream.read(&mut out), 2);
        assert_eq!(&out, b"ab");

        stream.transmit(b"xyz");
        let mut rest = [0u8; 4];
        let n = stream.read(&mut rest);
        assert_eq!(&rest[..n], b"cxyz");
        assert_eq!(stream.discarded(), 0);
    }
}
