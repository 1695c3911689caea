//! Bounded, thread-safe pool of reusable messages.
//!
//! Idle messages sit on a LIFO free list guarded by one mutex. The lock covers
//! list mutation only: messages are allocated and freed outside it.
//!
//! A returned message is freed instead of pooled when
//! - its capacity grew past `max_returned_message_size` (one huge log line
//!   must not pin memory in the pool forever), or
//! - the free list already holds `max_pool_size` messages.

use std::sync::{Mutex, MutexGuard};

use logbuf_core::config::PoolConfig;
use logbuf_core::error::Result;
use logbuf_core::id::MessageId;
use logbuf_core::message::Message;

use crate::counting::ActiveCountingFactory;
use crate::strategy::MessageStrategy;

#[derive(Debug)]
pub struct FreeList {
    initial_message_size: usize,
    max_message_size: usize,
    max_returned_message_size: usize,
    max_pool_size: usize,
    idle: Mutex<Vec<Message>>,
}

impl FreeList {
    /// Pre-populates `initial_pool_size` messages (capped at `max_pool_size`).
    pub fn new(
        initial_message_size: usize,
        max_message_size: usize,
        max_returned_message_size: usize,
        initial_pool_size: usize,
        max_pool_size: usize,
    ) -> Result<Self> {
        let prefill = initial_pool_size.min(max_pool_size);
        let mut idle = Vec::with_capacity(max_pool_size.min(1024).max(prefill));
        for _ in 0..prefill {
            idle.push(Message::growable(initial_message_size, max_message_size)?);
        }
        Ok(Self {
            initial_message_size,
            max_message_size,
            max_returned_message_size,
            max_pool_size,
            idle: Mutex::new(idle),
        })
    }

    // The list is consistent between any two statements that touch it, so a
    // panic elsewhere while the lock was held leaves nothing to repair.
    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.idle.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn pop(&self) -> Option<Message> {
        self.lock().pop()
    }

    /// Hands the message back if the list is full.
    fn push(&self, msg: Message) -> Option<Message> {
        let mut idle = self.lock();
        if idle.len() >= self.max_pool_size {
            return Some(msg);
        }
        idle.push(msg);
        None
    }
}

impl MessageStrategy for FreeList {
    fn create(&self) -> Result<Message> {
        match self.pop() {
            Some(mut msg) => {
                msg.clear();
                Ok(msg)
            }
            None => Message::growable(self.initial_message_size, self.max_message_size),
        }
    }

    fn recycle(&self, mut msg: Message) {
        if msg.capacity() > self.max_returned_message_size {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                capacity = msg.capacity(),
                limit = self.max_returned_message_size,
                "freeing oversized message instead of pooling it"
            );
            return;
        }
        msg.clear();
        if let Some(surplus) = self.push(msg) {
            #[cfg(feature = "tracing")]
            tracing::debug!(max_pool_size = self.max_pool_size, "pool full; freeing message");
            drop(surplus);
        }
    }
}

pub type BufferPool = ActiveCountingFactory<FreeList>;

impl BufferPool {
    pub fn new(
        initial_message_size: usize,
        max_message_size: usize,
        max_returned_message_size: usize,
        initial_pool_size: usize,
        max_pool_size: usize,
    ) -> Result<Self> {
        Ok(Self::with_strategy(FreeList::new(
            initial_message_size,
            max_message_size,
            max_returned_message_size,
            initial_pool_size,
            max_pool_size,
        )?))
    }

    /// Build from a validated config; `kind` is not consulted.
    pub fn from_config(cfg: &PoolConfig) -> Result<Self> {
        cfg.validate()?;
        Self::new(
            cfg.initial_message_size,
            cfg.max_message_size,
            cfg.max_returned_message_size,
            cfg.initial_pool_size,
            cfg.max_pool_size,
        )
    }

    pub fn initial_message_size(&self) -> usize {
        self.strategy().initial_message_size
    }

    pub fn max_message_size(&self) -> usize {
        self.strategy().max_message_size
    }

    pub fn max_returned_message_size(&self) -> usize {
        self.strategy().max_returned_message_size
    }

    pub fn max_pool_size(&self) -> usize {
        self.strategy().max_pool_size
    }

    /// Messages currently idle in the pool (advisory under concurrency).
    pub fn idle_count(&self) -> usize {
        self.strategy().lock().len()
    }

    /// Identities of the idle messages, bottom of the stack first.
    pub fn idle_ids(&self) -> Vec<MessageId> {
        self.strategy()
            .lock()
            .iter()
            .filter_map(Message::id)
            .collect()
    }
}
