//! Active-count accounting on top of any [`MessageStrategy`].

use std::time::Instant;

use logbuf_core::error::Result;
use logbuf_core::factory::MessageFactory;
use logbuf_core::message::Message;

use crate::counter::ActiveCounter;
use crate::strategy::MessageStrategy;

/// A message factory: a strategy plus checkout accounting.
///
/// Per message: `Idle -> CheckedOut` on obtain, `CheckedOut -> Idle` (pooled)
/// or destroyed on release.
#[derive(Debug)]
pub struct ActiveCountingFactory<S> {
    strategy: S,
    counter: ActiveCounter,
}

impl<S: MessageStrategy> ActiveCountingFactory<S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            strategy,
            counter: ActiveCounter::new(),
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Messages obtained but not yet released.
    pub fn active_count(&self) -> usize {
        self.counter.active()
    }

    /// Threads currently blocked in `wait_until_drained`.
    pub fn waiting_count(&self) -> usize {
        self.counter.waiting()
    }

    /// Largest number of messages checked out at once.
    pub fn peak_active(&self) -> usize {
        self.counter.peak()
    }
}

impl<S: MessageStrategy> MessageFactory for ActiveCountingFactory<S> {
    fn obtain(&self) -> Result<Message> {
        let msg = self.strategy.create()?;
        self.counter.checkout();
        Ok(msg)
    }

    fn release(&self, msg: Message) {
        if msg.is_detached() {
            return;
        }
        self.strategy.recycle(msg);
        self.counter.checkin();
    }

    fn wait_until_drained(&self, deadline: Option<Instant>) -> bool {
        let drained = self.counter.wait_until_zero(deadline);
        #[cfg(feature = "tracing")]
        if !drained {
            tracing::debug!(
                active = self.counter.active(),
                "drain wait expired before all messages returned"
            );
        }
        drained
    }
}
