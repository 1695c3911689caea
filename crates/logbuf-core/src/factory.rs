//! Buffer source and sink contracts.
//!
//! The concrete factories live in `logbuf-mem`. We keep only traits here so
//! any crate can be written against the capability set without pulling in the
//! pooling logic.

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::message::Message;

/// A source of empty messages.
///
/// Implementations are shared across threads. Every message handed out by
/// `obtain` must come back through `release` on the same factory exactly
/// once; returning a foreign message or the same message twice is a caller
/// error that implementations are not required to detect.
pub trait MessageFactory: Send + Sync {
    /// Obtain an empty message. Never blocks.
    ///
    /// Fails only with `Error::AllocFailed` when the buffer cannot be reserved.
    fn obtain(&self) -> Result<Message>;

    /// Hand a message back. Detached (moved-from) messages are ignored.
    fn release(&self, msg: Message);

    /// Block until every obtained message has been released or `deadline`
    /// passes. `None` waits indefinitely. Returns whether the factory drained.
    fn wait_until_drained(&self, deadline: Option<Instant>) -> bool;

    /// Shorthand for `wait_until_drained(None)`.
    fn wait_until_drained_indefinitely(&self) -> bool {
        self.wait_until_drained(None)
    }
}

/// Accepts ownership of completed messages.
///
/// A receiver must eventually pass each message to the `release` of the
/// factory that created it, synchronously or not, exactly once.
pub trait Receiver: Send + Sync {
    fn receive(&self, msg: Message);
}

impl<F: MessageFactory + ?Sized> MessageFactory for Arc<F> {
    fn obtain(&self) -> Result<Message> {
        (**self).obtain()
    }
    fn release(&self, msg: Message) {
        (**self).release(msg)
    }
    fn wait_until_drained(&self, deadline: Option<Instant>) -> bool {
        (**self).wait_until_drained(deadline)
    }
}

impl<R: Receiver + ?Sized> Receiver for Arc<R> {
    fn receive(&self, msg: Message) {
        (**self).receive(msg)
    }
}
