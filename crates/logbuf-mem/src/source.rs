//! The closed set of message factories, selected at construction.

use std::time::Instant;

use logbuf_core::config::{FactoryKind, PoolConfig};
use logbuf_core::error::Result;
use logbuf_core::factory::MessageFactory;
use logbuf_core::message::Message;

use crate::pool::BufferPool;
use crate::simple::SimpleFactory;

#[derive(Debug)]
pub enum MessageSource {
    Simple(SimpleFactory),
    Pool(BufferPool),
}

impl MessageSource {
    /// Validate `cfg` and build the variant named by `cfg.kind`.
    pub fn from_config(cfg: &PoolConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(match cfg.kind {
            FactoryKind::Simple => MessageSource::Simple(SimpleFactory::new(
                cfg.initial_message_size,
                cfg.max_message_size,
            )),
            FactoryKind::Pool => MessageSource::Pool(BufferPool::from_config(cfg)?),
        })
    }

    pub fn kind(&self) -> FactoryKind {
        match self {
            MessageSource::Simple(_) => FactoryKind::Simple,
            MessageSource::Pool(_) => FactoryKind::Pool,
        }
    }

    pub fn active_count(&self) -> usize {
        match self {
            MessageSource::Simple(f) => f.active_count(),
            MessageSource::Pool(p) => p.active_count(),
        }
    }

    pub fn waiting_count(&self) -> usize {
        match self {
            MessageSource::Simple(f) => f.waiting_count(),
            MessageSource::Pool(p) => p.waiting_count(),
        }
    }

    /// Idle messages held back for reuse; always 0 for the simple factory.
    pub fn idle_count(&self) -> usize {
        match self {
            MessageSource::Simple(_) => 0,
            MessageSource::Pool(p) => p.idle_count(),
        }
    }
}

impl From<SimpleFactory> for MessageSource {
    fn from(f: SimpleFactory) -> Self {
        MessageSource::Simple(f)
    }
}

impl From<BufferPool> for MessageSource {
    fn from(p: BufferPool) -> Self {
        MessageSource::Pool(p)
    }
}

impl MessageFactory for MessageSource {
    fn obtain(&self) -> Result<Message> {
        match self {
            MessageSource::Simple(f) => f.obtain(),
            MessageSource::Pool(p) => p.obtain(),
        }
    }

    fn release(&self, msg: Message) {
        match self {
            MessageSource::Simple(f) => f.release(msg),
            MessageSource::Pool(p) => p.release(msg),
        }
    }

    fn wait_until_drained(&self, deadline: Option<Instant>) -> bool {
        match self {
            MessageSource::Simple(f) => f.wait_until_drained(deadline),
            MessageSource::Pool(p) => p.wait_until_drained(deadline),
        }
    }
}
