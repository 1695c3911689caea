//! Explicitly constructed logging context.
//!
//! A [`LogContext`] owns one factory and one receiver and hands out cheap
//! [`Logger`] handles, one per destination. Thresholds live in a shared cell
//! per destination, so `set_level` reaches loggers created earlier.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use logbuf_core::config::PoolConfig;
use logbuf_core::error::Result;
use logbuf_core::factory::{MessageFactory, Receiver};
use logbuf_core::level::LogLevel;
use logbuf_mem::MessageSource;

use crate::stream::LogStream;

/// Threshold shared by every logger of one destination.
#[derive(Debug)]
struct LevelCell(AtomicU32);

impl LevelCell {
    fn new(level: LogLevel) -> Self {
        Self(AtomicU32::new(level.as_u32()))
    }

    fn get(&self) -> LogLevel {
        LogLevel::from_u32(self.0.load(Ordering::Relaxed)).unwrap_or_default()
    }

    fn set(&self, level: LogLevel) {
        self.0.store(level.as_u32(), Ordering::Relaxed);
    }
}

/// Handle for one destination. Clones share the threshold.
pub struct Logger<F: MessageFactory, R: Receiver> {
    factory: Arc<F>,
    receiver: Arc<R>,
    destination: Arc<str>,
    threshold: Arc<LevelCell>,
}

impl<F: MessageFactory, R: Receiver> Clone for Logger<F, R> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            receiver: Arc::clone(&self.receiver),
            destination: Arc::clone(&self.destination),
            threshold: Arc::clone(&self.threshold),
        }
    }
}

impl<F: MessageFactory, R: Receiver> Logger<F, R> {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Current threshold for this destination.
    pub fn level(&self) -> LogLevel {
        self.threshold.get()
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.threshold.get() <= level
    }

    /// Open a stream at `level`. The enabled decision is taken here, once.
    pub fn log(&self, level: LogLevel) -> LogStream<'_, F, R> {
        LogStream::new(
            &*self.factory,
            &*self.receiver,
            &self.destination,
            level,
            self.is_enabled(level),
        )
    }

    pub fn trace(&self) -> LogStream<'_, F, R> {
        self.log(LogLevel::Trace)
    }

    pub fn debug(&self) -> LogStream<'_, F, R> {
        self.log(LogLevel::Debug)
    }

    pub fn info(&self) -> LogStream<'_, F, R> {
        self.log(LogLevel::Info)
    }

    pub fn warn(&self) -> LogStream<'_, F, R> {
        self.log(LogLevel::Warn)
    }

    pub fn error(&self) -> LogStream<'_, F, R> {
        self.log(LogLevel::Error)
    }
}

pub struct LogContext<F: MessageFactory, R: Receiver> {
    factory: Arc<F>,
    receiver: Arc<R>,
    default_level: LogLevel,
    levels: Mutex<HashMap<String, Arc<LevelCell>>>,
}

impl<R: Receiver> LogContext<MessageSource, R> {
    /// Build the factory named by `cfg.kind`.
    pub fn from_config(
        cfg: &PoolConfig,
        receiver: Arc<R>,
        default_level: LogLevel,
    ) -> Result<Self> {
        let source = MessageSource::from_config(cfg)?;
        Ok(Self::new(Arc::new(source), receiver, default_level))
    }
}

impl<F: MessageFactory, R: Receiver> LogContext<F, R> {
    pub fn new(factory: Arc<F>, receiver: Arc<R>, default_level: LogLevel) -> Self {
        Self {
            factory,
            receiver,
            default_level,
            levels: Mutex::new(HashMap::new()),
        }
    }

    pub fn factory(&self) -> &Arc<F> {
        &self.factory
    }

    pub fn receiver(&self) -> &Arc<R> {
        &self.receiver
    }

    pub fn default_level(&self) -> LogLevel {
        self.default_level
    }

    pub fn logger(&self, destination: &str) -> Logger<F, R> {
        Logger {
            factory: Arc::clone(&self.factory),
            receiver: Arc::clone(&self.receiver),
            destination: Arc::from(destination),
            threshold: self.cell(destination),
        }
    }

    /// Threshold for `destination`; destinations never configured report the
    /// default.
    pub fn level(&self, destination: &str) -> LogLevel {
        self.lock_levels()
            .get(destination)
            .map_or(self.default_level, |cell| cell.get())
    }

    /// Change the threshold for `destination`, including loggers already
    /// handed out. Streams opened before the change keep their decision.
    pub fn set_level(&self, destination: &str, level: LogLevel) {
        self.cell(destination).set(level);
    }

    /// Wait for every outstanding message to come back. Returns whether the
    /// factory drained before `deadline`.
    pub fn shutdown(&self, deadline: Option<Instant>) -> bool {
        let drained = self.factory.wait_until_drained(deadline);
        #[cfg(feature = "tracing")]
        if !drained {
            tracing::warn!("log context shut down with messages still outstanding");
        }
        drained
    }

    fn lock_levels(&self) -> MutexGuard<'_, HashMap<String, Arc<LevelCell>>> {
        self.levels.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cell(&self, destination: &str) -> Arc<LevelCell> {
        let mut levels = self.lock_levels();
        if let Some(cell) = levels.get(destination) {
            return Arc::clone(cell);
        }
        let cell = Arc::new(LevelCell::new(self.default_level));
        levels.insert(destination.to_owned(), Arc::clone(&cell));
        cell
    }
}
