//! Drain-side formatting.
//!
//! Every routine renders into a fixed buffer on the stack: no allocation, no shared state,
//! no `core::fmt` machinery. Output is plain ASCII.

use core::ops::Deref;

use crate::event::{HexWidth, LogEvent, Record};
#[cfg(feature = "ansi-color")]
use crate::event::Color;
use crate::transport::Transport;

/// Room for `u32::MAX` plus a sign.
pub const DEC_CAP: usize = 11;
pub const HEX_CAP: usize = 8;
/// `ESC [ 3x m`
#[cfg(feature = "ansi-color")]
pub const SGR_CAP: usize = 5;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Formatted bytes living in a fixed stack buffer.
#[derive(Copy, Clone, Debug)]
pub struct FmtBuf<const CAP: usize> {
    buf: [u8; CAP],
    start: usize,
    end: usize,
}

impl<const CAP: usize> FmtBuf<CAP> {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }
}

impl<const CAP: usize> Deref for FmtBuf<CAP> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<const CAP: usize> AsRef<[u8]> for FmtBuf<CAP> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Write all ten digits of `value` into `out`, most significant first, and return how many
/// of them to keep: leading zeroes are trimmed, but zero itself keeps one digit.
#[inline]
fn decimal_digits(mut value: u32, out: &mut [u8]) -> usize {
    let mut divider = 1_000_000_000u32;
    for digit in out.iter_mut() {
        *digit = b'0' + (value / divider) as u8;
        value %= divider;
        divider /= 10;
    }

    let leading = out.iter().take_while(|&&d| d == b'0').count();
    if leading == out.len() { 1 } else { out.len() - leading }
}

/// Shortest decimal form of `value`; `0` renders as `"0"`.
pub fn format_unsigned_decimal(value: u32) -> FmtBuf<DEC_CAP> {
    let mut buf = [0u8; DEC_CAP];
    let n = decimal_digits(value, &mut buf[1..]);
    FmtBuf {
        buf,
        start: DEC_CAP - n,
        end: DEC_CAP,
    }
}

/// Decimal form of `value` with a leading `-` when negative.
///
/// The magnitude is taken with [`i32::unsigned_abs`], so `i32::MIN` renders as
/// `"-2147483648"` instead of overflowing on negation.
pub fn format_signed_decimal(value: i32) -> FmtBuf<DEC_CAP> {
    let mut out = format_unsigned_decimal(value.unsigned_abs());
    if value < 0 {
        out.start -= 1;
        out.buf[out.start] = b'-';
    }
    out
}

/// Exactly `width.digits()` uppercase hex digits: the low bits of `value`, most significant
/// nibble first. Higher bits are silently cut.
pub fn format_hex(value: u32, width: HexWidth) -> FmtBuf<HEX_CAP> {
    let mut buf = [0u8; HEX_CAP];
    let mut rest = value;
    for digit in buf.iter_mut().rev() {
        *digit = HEX_DIGITS[(rest & 0x0F) as usize];
        rest >>= 4;
    }
    FmtBuf {
        buf,
        start: HEX_CAP - width.digits(),
        end: HEX_CAP,
    }
}

/// `ESC [ <code> m` for `color`; empty for [`Color::None`].
#[cfg(feature = "ansi-color")]
pub fn format_color_prefix(color: Color) -> FmtBuf<SGR_CAP> {
    let mut buf = [0u8; SGR_CAP];
    let code = color.sgr_code();
    if code.is_empty() {
        return FmtBuf { buf, start: 0, end: 0 };
    }

    buf[0] = 0x1B;
    buf[1] = b'[';
    buf[2..2 + code.len()].copy_from_slice(code);
    let end = 2 + code.len();
    buf[end] = b'm';
    FmtBuf {
        buf,
        start: 0,
        end: end + 1,
    }
}

/// Render one event and hand the pieces to `transport`: the color prefix (if any), then
/// the payload.
pub fn write_event<T: Transport + ?Sized>(event: &LogEvent, transport: &mut T) {
    #[cfg(feature = "ansi-color")]
    {
        let prefix = format_color_prefix(event.color());
        if !prefix.is_empty() {
            transport.transmit(&prefix);
        }
    }

    match event.record() {
        Record::Str(bytes) => transport.transmit(bytes),
        Record::Unsigned(v) => transport.transmit(&format_unsigned_decimal(v)),
        Record::Signed(v) => transport.transmit(&format_signed_decimal(v)),
        Record::Hex(v, width) => transport.transmit(&format_hex(v, width)),
        Record::Char(c) => transport.transmit(&[c]),
    }
}
