//! Convenient re-exports for downstream crates.

pub use crate::config::{FactoryKind, PoolConfig};
pub use crate::error::{Error, Result};
pub use crate::factory::{MessageFactory, Receiver};
pub use crate::id::MessageId;
pub use crate::level::LogLevel;
pub use crate::message::Message;
