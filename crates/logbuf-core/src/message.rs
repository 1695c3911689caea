//! Growable, capacity-bounded byte buffer carrying one log entry.
//!
//! A `Message` has three sizes:
//! - `len`: bytes occupied so far (`[0, len)` is the payload),
//! - `capacity`: bytes currently allocated,
//! - `max_capacity`: the ceiling `capacity` may never exceed.
//!
//! Invariant: `len <= capacity <= max_capacity`, and `capacity` only grows.
//! Growth keeps the occupied bytes.

use std::fmt;
use std::mem;

use crate::error::{Error, Result};
use crate::id::MessageId;
use crate::level::LogLevel;

pub struct Message {
    id: Option<MessageId>,
    /// Allocated storage; `buf.len()` is the capacity.
    buf: Vec<u8>,
    len: usize,
    max_capacity: usize,
    level: LogLevel,
    destination: String,
}

impl Message {
    /// Fixed-size message: `capacity == max_capacity`.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::growable(capacity, capacity)
    }

    /// Message starting at `initial` bytes that may grow up to `max`.
    ///
    /// An `initial` above `max` is clamped to `max`.
    pub fn growable(initial: usize, max: usize) -> Result<Self> {
        let initial = initial.min(max);
        Ok(Self {
            id: Some(MessageId::next()),
            buf: alloc_zeroed(initial)?,
            len: 0,
            max_capacity: max,
            level: LogLevel::default(),
            destination: String::new(),
        })
    }

    /// Identity of the underlying allocation; `None` once detached.
    pub fn id(&self) -> Option<MessageId> {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Free bytes between the occupied end and the capacity.
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn is_at_max_capacity(&self) -> bool {
        self.capacity() == self.max_capacity
    }

    /// True for the empty shell left behind by [`Message::take`].
    pub fn is_detached(&self) -> bool {
        self.id.is_none()
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_destination(&mut self, destination: &str) {
        self.destination.clear();
        self.destination.push_str(destination);
    }

    /// The occupied bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The unoccupied tail `[len, capacity)`. Pair with [`Message::set_len`]
    /// after a raw copy.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.len..]
    }

    /// Move the occupied end. Values past the capacity are clamped to it.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.capacity());
    }

    /// Reset the occupied length to zero. Capacity and tags are kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Copy as much of `data` as fits in the available space, without growing.
    /// Returns the number of bytes copied.
    pub fn append(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.available());
        self.buf[self.len..self.len + n].copy_from_slice(&data[..n]);
        self.len += n;
        n
    }

    /// Grow toward `desired` bytes, clamped to `max_capacity`.
    ///
    /// Requests at or below the current capacity are a no-op. Returns the
    /// capacity after the call; if the allocator refuses the extra bytes the
    /// capacity is left unchanged.
    pub fn grow(&mut self, desired: usize) -> usize {
        let current = self.capacity();
        let target = desired.max(current).min(self.max_capacity);
        if target > current && self.buf.try_reserve_exact(target - current).is_ok() {
            self.buf.resize(target, 0);
        }
        self.capacity()
    }

    /// Exclusive move: returns this message and leaves a detached, zero-sized
    /// message in its place.
    pub fn take(&mut self) -> Message {
        mem::take(self)
    }
}

impl Default for Message {
    /// A detached message: no storage, no identity, `max_capacity == 0`.
    fn default() -> Self {
        Self {
            id: None,
            buf: Vec::new(),
            len: 0,
            max_capacity: 0,
            level: LogLevel::default(),
            destination: String::new(),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.max_capacity)
            .field("level", &self.level)
            .field("destination", &self.destination)
            .finish()
    }
}

/// Writes the occupied bytes, lossily decoded as UTF-8.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

fn alloc_zeroed(bytes: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| Error::AllocFailed { bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}
