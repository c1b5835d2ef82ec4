//! [`log`] facade backend that defers instead of formatting.
//!
//! `log::Record` carries `core::fmt::Arguments`, and formatting them in the caller's
//! context is exactly what this crate avoids. The bridge therefore only forwards messages
//! that are plain literals ([`Arguments::as_str`](core::fmt::Arguments::as_str) returns
//! `Some`); for messages with runtime arguments it queues the record's static module path
//! followed by [`ELIDED`]. Each record becomes three events (level tag, text, line end), so
//! under overflow a line may lose its tail.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::event::Color;
use crate::logger::Logger;

/// Appended when a record's arguments could not be deferred.
pub const ELIDED: &str = ": <formatted message elided>";

const fn level_tag(level: Level) -> (&'static str, Color) {
    match level {
        Level::Error => ("[E] ", Color::Red),
        Level::Warn => ("[W] ", Color::Yellow),
        Level::Info => ("[I] ", Color::Green),
        Level::Debug => ("[D] ", Color::Default),
        Level::Trace => ("[T] ", Color::Default),
    }
}

/// `log::Log` implementation queueing into a `'static` [`Logger`].
pub struct LogBridge<const N: usize> {
    logger: &'static Logger<N>,
    level: LevelFilter,
}

impl<const N: usize> LogBridge<N> {
    pub const fn new(logger: &'static Logger<N>, level: LevelFilter) -> Self {
        Self { logger, level }
    }

    /// Install this bridge as the global `log` backend.
    ///
    /// Uses the racy setters inside a critical section so it works on targets without
    /// atomic pointer support.
    pub fn register(&'static self) -> Result<(), SetLoggerError> {
        critical_section::with(|_cs| {
            // SAFETY: the critical section keeps any other logger setter from interleaving.
            unsafe {
                log::set_logger_racy(self)?;
                log::set_max_level_racy(self.level);
            }
            Ok(())
        })
    }
}

impl<const N: usize> Log for LogBridge<N> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let (tag, color) = level_tag(record.level());
        self.logger.emit_str(tag, color);
        match record.args().as_str() {
            Some(text) => {
                self.logger.emit_str(text, Color::Default);
            }
            None => {
                self.logger
                    .emit_str(record.module_path_static().unwrap_or("?"), Color::Default);
                self.logger.emit_str(ELIDED, Color::None);
            }
        }
        self.logger.emit_str("\r\n", Color::None);
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::{ELIDED, LogBridge};
    use crate::logger::Logger;
    use log::{Level, LevelFilter, Log, Record};
    use std::string::String;
    use std::vec::Vec;

    fn drain_text<const N: usize>(logger: &Logger<N>) -> String {
        let mut out = Vec::new();
        logger.drain_all(&mut |b: &[u8]| out.extend_from_slice(b));
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn literal_messages_are_deferred() {
        static LOGGER: Logger<16> = Logger::new();
        static BRIDGE: LogBridge<16> = LogBridge::new(&LOGGER, LevelFilter::Info);
        LOGGER.init();

        BRIDGE.log(
            &Record::builder()
                .args(format_args!("boot ok"))
                .level(Level::Warn)
                .build(),
        );

        let text = drain_text(&LOGGER);
        assert!(text.contains("[W] "));
        assert!(text.ends_with("boot ok\r\n"));
    }

    #[test]
    fn formatted_messages_are_elided() {
        static LOGGER: Logger<16> = Logger::new();
        static BRIDGE: LogBridge<16> = LogBridge::new(&LOGGER, LevelFilter::Trace);
        LOGGER.init();

        let volts = 33;
        BRIDGE.log(
            &Record::builder()
                .args(format_args!("vbat={volts}"))
                .level(Level::Info)
                .module_path_static(Some("app::power"))
                .build(),
        );

        let text = drain_text(&LOGGER);
        assert!(text.contains("app::power"));
        assert!(text.contains(ELIDED));
        assert!(!text.contains("vbat"));
    }

    #[test]
    fn filtered_levels_are_skipped() {
        static LOGGER: Logger<16> = Logger::new();
        static BRIDGE: LogBridge<16> = LogBridge::new(&LOGGER, LevelFilter::Warn);
        LOGGER.init();

        BRIDGE.log(
            &Record::builder()
                .args(format_args!("chatty"))
                .level(Level::Debug)
                .build(),
        );
        assert_eq!(LOGGER.pending(), 0);
    }
}
