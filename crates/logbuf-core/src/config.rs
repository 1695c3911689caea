//! Factory configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which message source to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryKind {
    /// Allocate on obtain, free on release.
    Simple,
    /// Recycle idle messages through a bounded free list.
    #[default]
    Pool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub kind: FactoryKind,

    /// Capacity of a freshly allocated message (bytes).
    pub initial_message_size: usize,

    /// Ceiling any message may grow to (bytes).
    pub max_message_size: usize,

    /// Messages whose capacity exceeds this are freed instead of pooled (bytes).
    pub max_returned_message_size: usize,

    /// Messages allocated up front (count). Ignored by the simple factory.
    pub initial_pool_size: usize,

    /// Upper bound on idle messages kept (count). Ignored by the simple factory.
    pub max_pool_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            kind: FactoryKind::Pool,
            initial_message_size: 256,
            max_message_size: 64 * 1024,
            max_returned_message_size: 4 * 1024,
            initial_pool_size: 16,
            max_pool_size: 64,
        }
    }
}

impl PoolConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LOGBUF_FACTORY`: `simple` or `pool`
    /// - `LOGBUF_INITIAL_MESSAGE_SIZE`: initial message capacity in bytes
    /// - `LOGBUF_MAX_MESSAGE_SIZE`: maximum message capacity in bytes
    /// - `LOGBUF_MAX_RETURNED_MESSAGE_SIZE`: largest capacity accepted back into the pool
    /// - `LOGBUF_INITIAL_POOL_SIZE`: messages allocated up front
    /// - `LOGBUF_MAX_POOL_SIZE`: maximum idle messages
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LOGBUF_FACTORY") {
            match s.trim() {
                "simple" => cfg.kind = FactoryKind::Simple,
                "pool" => cfg.kind = FactoryKind::Pool,
                _ => {}
            }
        }

        if let Ok(s) = std::env::var("LOGBUF_INITIAL_MESSAGE_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.initial_message_size = v;
            }
        }

        if let Ok(s) = std::env::var("LOGBUF_MAX_MESSAGE_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_message_size = v;
            }
        }

        if let Ok(s) = std::env::var("LOGBUF_MAX_RETURNED_MESSAGE_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_returned_message_size = v;
            }
        }

        if let Ok(s) = std::env::var("LOGBUF_INITIAL_POOL_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.initial_pool_size = v;
            }
        }

        if let Ok(s) = std::env::var("LOGBUF_MAX_POOL_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_pool_size = v;
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_message_size == 0 {
            return Err(Error::Config(
                "max_message_size must be at least one byte".into(),
            ));
        }
        if self.initial_message_size > self.max_message_size {
            return Err(Error::Config(format!(
                "initial_message_size ({}) exceeds max_message_size ({})",
                self.initial_message_size, self.max_message_size
            )));
        }
        if self.initial_pool_size > self.max_pool_size {
            return Err(Error::Config(format!(
                "initial_pool_size ({}) exceeds max_pool_size ({})",
                self.initial_pool_size, self.max_pool_size
            )));
        }
        Ok(())
    }
}
