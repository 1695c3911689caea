//! Shared receiver for the integration suites.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use logbuf_core::factory::{MessageFactory, Receiver};
use logbuf_core::level::LogLevel;
use logbuf_core::message::Message;

/// Keeps delivered messages until `release_all` (or drop) returns them to
/// the factory that issued them.
pub struct Collector<F: MessageFactory> {
    factory: Arc<F>,
    received: Mutex<Vec<Message>>,
}

impl<F: MessageFactory> Collector<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self {
            factory,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// `(payload, capacity)` per delivered message, in delivery order.
    pub fn contents(&self) -> Vec<(Vec<u8>, usize)> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|m| (m.as_bytes().to_vec(), m.capacity()))
            .collect()
    }

    /// Concatenated payloads in delivery order.
    pub fn joined(&self) -> Vec<u8> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .flat_map(|m| m.as_bytes().iter().copied())
            .collect()
    }

    pub fn tags(&self) -> Vec<(String, LogLevel)> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|m| (m.destination().to_owned(), m.level()))
            .collect()
    }

    pub fn release_all(&self) {
        let drained: Vec<Message> = self.received.lock().unwrap().drain(..).collect();
        for msg in drained {
            self.factory.release(msg);
        }
    }
}

impl<F: MessageFactory> Receiver for Collector<F> {
    fn receive(&self, msg: Message) {
        self.received.lock().unwrap().push(msg);
    }
}

impl<F: MessageFactory> Drop for Collector<F> {
    fn drop(&mut self) {
        if let Ok(held) = self.received.get_mut() {
            for msg in held.drain(..) {
                self.factory.release(msg);
            }
        }
    }
}

/// Deterministic printable payload of `len` bytes.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}
