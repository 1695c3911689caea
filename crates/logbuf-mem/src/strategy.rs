//! The pluggable half of a message factory.

use logbuf_core::error::Result;
use logbuf_core::message::Message;

/// How messages are produced and reclaimed.
///
/// [`crate::ActiveCountingFactory`] calls `create` on every obtain and
/// `recycle` on every non-detached release; accounting is its job, not the
/// strategy's.
pub trait MessageStrategy: Send + Sync {
    /// Produce an empty message. Must not block beyond a short critical section.
    fn create(&self) -> Result<Message>;

    /// Take back a message: destroy it or keep it for a later `create`.
    fn recycle(&self, msg: Message);
}
