#![forbid(unsafe_code)]
//! logbuf-core: message buffers and the contracts around them.
//!
//! This crate holds the data model (`Message`, `MessageId`, `LogLevel`), the
//! configuration surface (`PoolConfig`) and the two capabilities every other
//! crate is written against: `MessageFactory` (where buffers come from) and
//! `Receiver` (where completed buffers go).
//!
//! Concrete factories live in `logbuf-mem`; the incremental writer lives in
//! `logbuf-stream`.

pub mod config;
pub mod error;
pub mod factory;
pub mod id;
pub mod level;
pub mod message;
pub mod prelude;

pub use config::{FactoryKind, PoolConfig};
pub use error::{Error, Result};
pub use factory::{MessageFactory, Receiver};
pub use id::MessageId;
pub use level::LogLevel;
pub use message::Message;
