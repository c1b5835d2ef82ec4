//! Typed log events.
//!
//! A [`LogEvent`] is a small `Copy` record: a [`Record`] saying what to print plus, with the
//! `ansi-color` feature, the [`Color`] to print it in. Nothing is formatted when an event is
//! built; the formatter turns it into text later, on the drain side.
//!
//! # Borrowed strings
//! String events borrow the bytes they print; the queue never copies them. The safe
//! constructors only accept `'static` data. [`LogEvent::raw`] accepts any memory and makes
//! its lifetime the caller's problem: if the buffer is reused or freed before the event is
//! drained, the transmitted text is garbage.

/// Terminal color applied before an event's text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Leave the terminal state alone.
    #[default]
    None,
    /// Reset to the terminal's default attributes.
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// SGR parameter for this color. Empty for [`Color::None`].
    pub const fn sgr_code(self) -> &'static [u8] {
        match self {
            Color::None => b"",
            Color::Default => b"0",
            Color::Black => b"30",
            Color::Red => b"31",
            Color::Green => b"32",
            Color::Yellow => b"33",
            Color::Blue => b"34",
            Color::Magenta => b"35",
            Color::Cyan => b"36",
            Color::White => b"37",
        }
    }
}

/// Number of hex digits rendered for a [`Record::Hex`] value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HexWidth {
    Two,
    Four,
    Eight,
}

impl HexWidth {
    #[inline]
    pub const fn digits(self) -> usize {
        match self {
            HexWidth::Two => 2,
            HexWidth::Four => 4,
            HexWidth::Eight => 8,
        }
    }
}

/// Discriminant of a [`Record`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    RawString,
    UnsignedDecimal,
    SignedDecimal,
    Hex2,
    Hex4,
    Hex8,
    Char,
}

/// What an event prints.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Record {
    /// Bytes forwarded verbatim. At most `u16::MAX` long.
    Str(&'static [u8]),
    Unsigned(u32),
    Signed(i32),
    /// Low `width.digits() * 4` bits, uppercase, zero padded.
    Hex(u32, HexWidth),
    /// A single byte forwarded verbatim.
    Char(u8),
}

impl Record {
    pub const fn kind(&self) -> EventKind {
        match self {
            Record::Str(_) => EventKind::RawString,
            Record::Unsigned(_) => EventKind::UnsignedDecimal,
            Record::Signed(_) => EventKind::SignedDecimal,
            Record::Hex(_, HexWidth::Two) => EventKind::Hex2,
            Record::Hex(_, HexWidth::Four) => EventKind::Hex4,
            Record::Hex(_, HexWidth::Eight) => EventKind::Hex8,
            Record::Char(_) => EventKind::Char,
        }
    }
}

/// One queued log item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogEvent {
    record: Record,
    #[cfg(feature = "ansi-color")]
    color: Color,
}

/// Raw strings carry a 16-bit length; longer input is cut.
const MAX_STR_LEN: usize = u16::MAX as usize;

const fn clamp_len(bytes: &'static [u8]) -> &'static [u8] {
    if bytes.len() > MAX_STR_LEN {
        bytes.split_at(MAX_STR_LEN).0
    } else {
        bytes
    }
}

impl LogEvent {
    /// Build an event. `color` is ignored when the `ansi-color` feature is off.
    pub const fn new(record: Record, color: Color) -> Self {
        #[cfg(not(feature = "ansi-color"))]
        let _ = color;
        let record = match record {
            Record::Str(bytes) => Record::Str(clamp_len(bytes)),
            other => other,
        };
        Self {
            record,
            #[cfg(feature = "ansi-color")]
            color,
        }
    }

    #[inline]
    pub const fn string(s: &'static str, color: Color) -> Self {
        Self::new(Record::Str(s.as_bytes()), color)
    }

    #[inline]
    pub const fn bytes(bytes: &'static [u8], color: Color) -> Self {
        Self::new(Record::Str(bytes), color)
    }

    /// String event over caller-owned memory.
    ///
    /// # Safety
    /// `ptr` must be valid for reads of `len` bytes, and those bytes must stay allocated and
    /// unmodified until the event has been drained (or the queue reset). The queue stores the
    /// pointer, not a copy.
    #[inline]
    pub const unsafe fn raw(ptr: *const u8, len: u16, color: Color) -> Self {
        // SAFETY: forwarded to the caller; the 'static bound is only as long as the contract above.
        let bytes: &'static [u8] = unsafe { core::slice::from_raw_parts(ptr, len as usize) };
        Self::new(Record::Str(bytes), color)
    }

    #[inline]
    pub const fn unsigned(value: u32, color: Color) -> Self {
        Self::new(Record::Unsigned(value), color)
    }

    #[inline]
    pub const fn signed(value: i32, color: Color) -> Self {
        Self::new(Record::Signed(value), color)
    }

    #[inline]
    pub const fn hex(value: u32, width: HexWidth, color: Color) -> Self {
        Self::new(Record::Hex(value, width), color)
    }

    #[inline]
    pub const fn char(c: u8, color: Color) -> Self {
        Self::new(Record::Char(c), color)
    }

    #[inline]
    pub const fn record(&self) -> Record {
        self.record
    }

    #[inline]
    pub const fn kind(&self) -> EventKind {
        self.record.kind()
    }

    /// Color of this event; always [`Color::None`] without the `ansi-color` feature.
    #[inline]
    pub const fn color(&self) -> Color {
        #[cfg(feature = "ansi-color")]
        {
            self.color
        }
        #[cfg(not(feature = "ansi-color"))]
        {
            Color::None
        }
    }
}
