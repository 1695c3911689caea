#![forbid(unsafe_code)]
//! logbuf: buffered log messages with pluggable factories.
//!
//! Re-exports the workspace crates so applications depend on one package.

pub use logbuf_core::prelude::*;
pub use logbuf_mem::{
    ActiveCountingFactory, BufferPool, MessageSource, MessageStrategy, Misuse, SimpleFactory,
    TrackingFactory, POLL_INTERVAL,
};
pub use logbuf_stream::{LogContext, LogStream, Logger, StreamWriter};
