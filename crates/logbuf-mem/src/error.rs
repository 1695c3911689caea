use thiserror::Error;

use logbuf_core::id::MessageId;

/// Protocol misuse recorded by [`crate::TrackingFactory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Misuse {
    #[error("{0} was returned more than once")]
    ReturnedTwice(MessageId),

    #[error("{0} was returned but never issued by this factory")]
    NotIssued(MessageId),
}
