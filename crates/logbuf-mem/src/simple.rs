//! Allocate on obtain, free on release.

use logbuf_core::error::Result;
use logbuf_core::message::Message;

use crate::counting::ActiveCountingFactory;
use crate::strategy::MessageStrategy;

#[derive(Debug, Clone, Copy)]
pub struct HeapAllocator {
    initial_message_size: usize,
    max_message_size: usize,
}

impl HeapAllocator {
    pub fn new(initial_message_size: usize, max_message_size: usize) -> Self {
        Self {
            initial_message_size,
            max_message_size,
        }
    }
}

impl MessageStrategy for HeapAllocator {
    fn create(&self) -> Result<Message> {
        Message::growable(self.initial_message_size, self.max_message_size)
    }

    fn recycle(&self, msg: Message) {
        drop(msg);
    }
}

pub type SimpleFactory = ActiveCountingFactory<HeapAllocator>;

impl SimpleFactory {
    pub fn new(initial_message_size: usize, max_message_size: usize) -> Self {
        Self::with_strategy(HeapAllocator::new(initial_message_size, max_message_size))
    }

    pub fn initial_message_size(&self) -> usize {
        self.strategy().initial_message_size
    }

    pub fn max_message_size(&self) -> usize {
        self.strategy().max_message_size
    }
}
