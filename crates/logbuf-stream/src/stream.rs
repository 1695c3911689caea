//! A `StreamWriter` behind an enabled flag fixed at construction.

use std::fmt;
use std::io;

use logbuf_core::error::Result;
use logbuf_core::factory::{MessageFactory, Receiver};
use logbuf_core::level::LogLevel;

use crate::writer::StreamWriter;

/// One log statement's worth of output.
///
/// A disabled stream accepts and discards everything without touching the
/// factory or the receiver. Dropping an enabled stream flushes it.
pub struct LogStream<'a, F: MessageFactory + ?Sized, R: Receiver + ?Sized> {
    writer: StreamWriter<'a, F, R>,
    enabled: bool,
}

impl<'a, F: MessageFactory + ?Sized, R: Receiver + ?Sized> LogStream<'a, F, R> {
    pub fn new(
        factory: &'a F,
        receiver: &'a R,
        destination: &'a str,
        level: LogLevel,
        enabled: bool,
    ) -> Self {
        Self {
            writer: StreamWriter::new(factory, receiver, destination, level),
            enabled,
        }
    }

    pub fn destination(&self) -> &str {
        self.writer.destination()
    }

    pub fn level(&self) -> LogLevel {
        self.writer.level()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Raw write. A disabled stream reports every byte as consumed.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        if !self.enabled {
            return Ok(data.len());
        }
        self.writer.write_bytes(data)
    }

    /// Format `value` with `Display` and append it.
    pub fn display<T: fmt::Display + ?Sized>(&mut self, value: &T) -> &mut Self {
        if self.enabled
            && fmt::Write::write_fmt(&mut self.writer, format_args!("{value}")).is_err()
        {
            // Only obtaining a message can fail here.
            #[cfg(feature = "tracing")]
            tracing::warn!(
                destination = self.writer.destination(),
                "no message could be obtained; dropping formatted value"
            );
        }
        self
    }

    pub fn flush(&mut self) {
        if self.enabled {
            self.writer.flush();
        }
    }
}

impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> io::Write for LogStream<'_, F, R> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.enabled {
            return Ok(buf.len());
        }
        io::Write::write(&mut self.writer, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        LogStream::flush(self);
        Ok(())
    }
}

impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> fmt::Write for LogStream<'_, F, R> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.enabled {
            return Ok(());
        }
        fmt::Write::write_str(&mut self.writer, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::sync::Mutex;

    use logbuf_core::message::Message;
    use logbuf_mem::SimpleFactory;

    /// Records payloads and returns each message right away.
    struct Echo<'f> {
        factory: &'f SimpleFactory,
        lines: Mutex<Vec<String>>,
    }

    impl Receiver for Echo<'_> {
        fn receive(&self, msg: Message) {
            self.lines.lock().unwrap().push(msg.to_string());
            self.factory.release(msg);
        }
    }

    #[test]
    fn test_disabled_stream_touches_nothing() {
        let factory = SimpleFactory::new(8, 64);
        let echo = Echo {
            factory: &factory,
            lines: Mutex::new(Vec::new()),
        };
        {
            let mut s = LogStream::new(&factory, &echo, "quiet", LogLevel::Debug, false);
            assert_eq!(s.write_bytes(b"ignored").unwrap(), 7);
            write!(s, "{}", 42).unwrap();
            s.display("more");
            s.flush();
            assert_eq!(factory.active_count(), 0);
        }
        assert!(echo.lines.lock().unwrap().is_empty());
        assert_eq!(factory.peak_active(), 0);
    }

    #[test]
    fn test_display_survives_allocation_failure() {
        let factory = SimpleFactory::new(usize::MAX, usize::MAX);
        let echo = Echo {
            factory: &factory,
            lines: Mutex::new(Vec::new()),
        };
        {
            let mut s = LogStream::new(&factory, &echo, "oom", LogLevel::Error, true);
            s.display("lost").display(&7);
            assert!(s.write_bytes(b"lost").is_err());
        }
        assert!(echo.lines.lock().unwrap().is_empty());
        assert_eq!(factory.active_count(), 0);
    }

    #[test]
    fn test_enabled_stream_delivers_on_drop() {
        let factory = SimpleFactory::new(8, 64);
        let echo = Echo {
            factory: &factory,
            lines: Mutex::new(Vec::new()),
        };
        {
            let mut s = LogStream::new(&factory, &echo, "loud", LogLevel::Info, true);
            assert!(s.is_enabled());
            assert_eq!(s.destination(), "loud");
            write!(s, "answer={}", 42).unwrap();
            s.display(" ok");
        }
        assert_eq!(*echo.lines.lock().unwrap(), vec!["answer=42 ok".to_string()]);
        assert_eq!(factory.active_count(), 0);
    }
}
