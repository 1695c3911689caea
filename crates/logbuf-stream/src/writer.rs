//! Incremental writer over the factory/message/receiver triad.
//!
//! States: no message held -> filling -> (full) handed to the receiver.
//!
//! `write_bytes` obtains a message lazily, grows it by doubling toward the
//! size the pending input needs (clamped to the message's max capacity), and
//! when a message is full hands it to the receiver and continues in a fresh
//! one. Byte order is preserved across every rollover. Input is dropped only
//! when a message cannot hold a single byte even at its max capacity.

use std::io;

use logbuf_core::error::Result;
use logbuf_core::factory::{MessageFactory, Receiver};
use logbuf_core::level::LogLevel;
use logbuf_core::message::Message;

/// Used by one thread at a time; there is no internal synchronization.
pub struct StreamWriter<'a, F: MessageFactory + ?Sized, R: Receiver + ?Sized> {
    factory: &'a F,
    receiver: &'a R,
    destination: &'a str,
    level: LogLevel,
    current: Option<Message>,
}

impl<'a, F: MessageFactory + ?Sized, R: Receiver + ?Sized> StreamWriter<'a, F, R> {
    pub fn new(factory: &'a F, receiver: &'a R, destination: &'a str, level: LogLevel) -> Self {
        Self {
            factory,
            receiver,
            destination,
            level,
            current: None,
        }
    }

    pub fn destination(&self) -> &str {
        self.destination
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a partially filled message is currently held.
    pub fn has_pending(&self) -> bool {
        self.current.is_some()
    }

    /// Bytes written into the held message so far.
    pub fn position(&self) -> usize {
        self.current.as_ref().map_or(0, Message::len)
    }

    /// Append `data`, rolling over into new messages as needed.
    ///
    /// Returns how many bytes were stored; less than `data.len()` only when a
    /// message cannot hold even one byte. Fails only if obtaining a message
    /// fails.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let mut rest = data;
        while !rest.is_empty() {
            if self.current.as_ref().map_or(false, Message::is_full) {
                self.hand_off();
            }
            if self.current.is_none() {
                self.current = Some(self.fresh_message()?);
            }
            let Some(msg) = self.current.as_mut() else {
                break;
            };

            if msg.available() < rest.len() {
                msg.grow(doubling_target(
                    msg.capacity(),
                    msg.len() + rest.len(),
                    msg.max_capacity(),
                ));
                if msg.available() == 0 {
                    break;
                }
            }

            let n = msg.append(rest);
            rest = &rest[n..];
        }

        #[cfg(feature = "tracing")]
        if !rest.is_empty() {
            tracing::warn!(
                destination = self.destination,
                dropped = rest.len(),
                "message cannot hold a single byte; dropping write"
            );
        }
        Ok(data.len() - rest.len())
    }

    /// Append one byte. A full message first tries to double its capacity;
    /// if it cannot grow it is handed off and the byte starts a new message.
    ///
    /// Returns `false` when the byte could not be stored.
    pub fn put_byte(&mut self, byte: u8) -> Result<bool> {
        if let Some(msg) = self.current.as_mut() {
            if msg.is_full() {
                let old = msg.capacity();
                if msg.grow(old.saturating_mul(2).max(1)) == old {
                    if msg.max_capacity() == 0 {
                        return Ok(false);
                    }
                    self.hand_off();
                }
            }
        }
        if self.current.is_none() {
            self.current = Some(self.fresh_message()?);
        }
        let Some(msg) = self.current.as_mut() else {
            return Ok(false);
        };
        if msg.is_full() {
            msg.grow(1);
        }
        Ok(msg.append(&[byte]) == 1)
    }

    /// Hand the held message, if any, to the receiver. Idempotent.
    pub fn flush(&mut self) {
        self.hand_off();
    }

    fn hand_off(&mut self) {
        if let Some(msg) = self.current.take() {
            self.receiver.receive(msg);
        }
    }

    fn fresh_message(&self) -> Result<Message> {
        let mut msg = self.factory.obtain()?;
        msg.set_level(self.level);
        msg.set_destination(self.destination);
        Ok(msg)
    }
}

impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> Drop for StreamWriter<'_, F, R> {
    fn drop(&mut self) {
        self.hand_off();
    }
}

/// Smallest power-of-two multiple of `current` that reaches `target`, or
/// `max` once doubling would pass it.
fn doubling_target(current: usize, target: usize, max: usize) -> usize {
    let mut cap = current.max(1);
    while cap < target {
        if cap >= max {
            return max;
        }
        cap = cap.saturating_mul(2);
    }
    cap
}

impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> io::Write for StreamWriter<'_, F, R> {
    /// Undeliverable bytes are dropped, not reported as a short write.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.hand_off();
        Ok(())
    }
}

impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> std::fmt::Write
    for StreamWriter<'_, F, R>
{
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.write_bytes(s.as_bytes())
            .map(|_| ())
            .map_err(|_| std::fmt::Error)
    }
}

/// Write-only: reading always reports end of input.
impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> io::Read for StreamWriter<'_, F, R> {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

/// Seeking never moves the cursor; every request reports the current position.
impl<F: MessageFactory + ?Sized, R: Receiver + ?Sized> io::Seek for StreamWriter<'_, F, R> {
    fn seek(&mut self, _pos: io::SeekFrom) -> io::Result<u64> {
        Ok(self.position() as u64)
    }
}
