//! Issued/returned bookkeeping for catching protocol misuse.
//!
//! Keep this out of hot paths: every call takes a lock. Meant for tests and
//! debug builds of a logging backend.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use logbuf_core::error::Result;
use logbuf_core::factory::MessageFactory;
use logbuf_core::id::MessageId;
use logbuf_core::message::Message;

use crate::error::Misuse;

#[derive(Debug, Default)]
struct Ledger {
    /// Checked out right now, in issue order.
    issued: Vec<MessageId>,
    /// Every return accepted so far, in return order.
    returned: Vec<MessageId>,
    errors: Vec<Misuse>,
}

/// Wraps a factory and records which messages went out and came back.
///
/// A double return or a return of a message this factory never issued is
/// recorded as a [`Misuse`] and the message is dropped without reaching the
/// inner factory, so the inner accounting stays correct.
#[derive(Debug)]
pub struct TrackingFactory<F> {
    inner: F,
    ledger: Mutex<Ledger>,
}

impl<F: MessageFactory> TrackingFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ids checked out and not yet returned.
    pub fn issued(&self) -> Vec<MessageId> {
        self.ledger().issued.clone()
    }

    /// Ids returned so far (a recycled message appears once per return).
    pub fn returned(&self) -> Vec<MessageId> {
        self.ledger().returned.clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.ledger().errors.is_empty()
    }

    pub fn errors(&self) -> Vec<Misuse> {
        self.ledger().errors.clone()
    }
}

impl<F: MessageFactory> MessageFactory for TrackingFactory<F> {
    fn obtain(&self) -> Result<Message> {
        let msg = self.inner.obtain()?;
        if let Some(id) = msg.id() {
            self.ledger().issued.push(id);
        }
        Ok(msg)
    }

    fn release(&self, msg: Message) {
        let Some(id) = msg.id() else {
            return;
        };

        let misuse = {
            let mut ledger = self.ledger();
            if let Some(pos) = ledger.issued.iter().position(|&i| i == id) {
                ledger.issued.remove(pos);
                ledger.returned.push(id);
                None
            } else {
                let misuse = if ledger.returned.contains(&id) {
                    Misuse::ReturnedTwice(id)
                } else {
                    Misuse::NotIssued(id)
                };
                ledger.errors.push(misuse.clone());
                Some(misuse)
            }
        };

        match misuse {
            None => self.inner.release(msg),
            Some(_m) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_m, "message factory misuse");
                drop(msg);
            }
        }
    }

    fn wait_until_drained(&self, deadline: Option<Instant>) -> bool {
        self.inner.wait_until_drained(deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::BufferPool;
    use crate::simple::SimpleFactory;

    #[test]
    fn test_tracks_issue_and_return() {
        let factory = TrackingFactory::new(SimpleFactory::new(128, 1024));
        let msg = factory.obtain().unwrap();
        let id = msg.id().unwrap();
        assert_eq!(factory.issued(), vec![id]);
        assert!(factory.returned().is_empty());

        factory.release(msg);
        assert!(factory.issued().is_empty());
        assert_eq!(factory.returned(), vec![id]);
        assert!(!factory.has_errors());
        assert_eq!(factory.inner().active_count(), 0);
    }

    #[test]
    fn test_issued_keeps_issue_order() {
        let factory = TrackingFactory::new(SimpleFactory::new(8, 8));
        let msgs: Vec<Message> = (0..3).map(|_| factory.obtain().unwrap()).collect();
        let ids: Vec<MessageId> = msgs.iter().filter_map(Message::id).collect();

        let mut msgs = msgs.into_iter();
        factory.release(msgs.next().unwrap());
        assert_eq!(factory.issued(), vec![ids[1], ids[2]]);

        for msg in msgs {
            factory.release(msg);
        }
        assert!(factory.issued().is_empty());
    }

    #[test]
    fn test_foreign_message_is_flagged() {
        let factory = TrackingFactory::new(SimpleFactory::new(16, 16));
        let held = factory.obtain().unwrap();
        let stranger = Message::with_capacity(16).unwrap();
        let id = stranger.id().unwrap();

        factory.release(stranger);
        assert_eq!(factory.errors(), vec![Misuse::NotIssued(id)]);
        // The inner count was not touched by the bad return.
        assert_eq!(factory.inner().active_count(), 1);
        factory.release(held);
    }

    #[test]
    fn test_double_return_is_flagged() {
        let factory = TrackingFactory::new(BufferPool::new(16, 16, 16, 1, 1).unwrap());
        let msg = factory.obtain().unwrap();
        let id = msg.id().unwrap();
        factory.release(msg);

        // Bypass the tracker: the pooled allocation comes back out untracked
        // and is then returned through the tracker a second time.
        let again = factory.inner().obtain().unwrap();
        assert_eq!(again.id(), Some(id));
        factory.release(again);

        assert_eq!(factory.errors(), vec![Misuse::ReturnedTwice(id)]);
        assert_eq!(factory.returned(), vec![id]);
        assert_eq!(factory.inner().active_count(), 1);
    }
}
