#![forbid(unsafe_code)]
//! logbuf-mem: where messages come from and where idle ones wait.
//!
//! This crate provides the concrete implementations of the
//! `logbuf-core::MessageFactory` contract. Every factory is an
//! [`ActiveCountingFactory`] wrapped around a [`MessageStrategy`]:
//! the wrapper does the checkout accounting and the drain wait, the strategy
//! decides how a message is produced and what happens when it comes back.
//!
//! - [`SimpleFactory`]: plain allocation and deallocation.
//! - [`BufferPool`]: bounded LIFO free list with an eviction policy.
//! - [`MessageSource`]: either of the above, picked from a `PoolConfig`.
//! - [`TrackingFactory`]: diagnostic wrapper that flags protocol misuse.

pub mod counter;
pub mod counting;
pub mod error;
pub mod pool;
pub mod simple;
pub mod source;
pub mod strategy;
pub mod tracking;

pub use counter::{ActiveCounter, POLL_INTERVAL};
pub use counting::ActiveCountingFactory;
pub use error::Misuse;
pub use pool::{BufferPool, FreeList};
pub use simple::{HeapAllocator, SimpleFactory};
pub use source::MessageSource;
pub use strategy::MessageStrategy;
pub use tracking::TrackingFactory;

pub use logbuf_core::error::{Error, Result};
