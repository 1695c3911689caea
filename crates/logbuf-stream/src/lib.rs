#![forbid(unsafe_code)]
//! logbuf-stream: turning formatted output into messages.
//!
//! - [`StreamWriter`] fills messages obtained from a `MessageFactory`, grows
//!   them on demand, rolls over to a fresh message when a message cannot grow
//!   further, and hands completed messages to a `Receiver`.
//! - [`LogStream`] adds the enabled/disabled decision taken once at
//!   construction.
//! - [`LogContext`] and [`Logger`] are the explicitly constructed facade:
//!   per-destination level thresholds plus a drain on shutdown.
//!
//! A writer is single-threaded; factories and receivers are shared.

pub mod context;
pub mod stream;
pub mod writer;

pub use context::{LogContext, Logger};
pub use stream::LogStream;
pub use writer::StreamWriter;
