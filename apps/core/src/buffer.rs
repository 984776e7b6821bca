use crate::models::{ChatMessage, InboundMessage};
use std::collections::VecDeque;

/// Capacity-bounded, arrival-ordered message buffer.
///
/// When full, the oldest messages are evicted silently. A capacity of 0 means unbounded.
#[derive(Debug, Default)]
pub struct MessageBuffer {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
    closed: bool,
}

impl MessageBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            capacity,
            closed: false,
        }
    }

    /// Accepts an inbound message and appends it to the tail.
    ///
    /// Returns `false` (and buffers nothing) when the username or text is blank,
    /// or once the buffer is closed.
    pub fn append(&mut self, inbound: InboundMessage) -> bool {
        if self.closed {
            return false;
        }
        match inbound.accept() {
            Some(message) => {
                self.push(message);
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        self.trim();
    }

    /// Returns every buffered message in arrival order and leaves the buffer empty.
    pub fn drain_all(&mut self) -> Vec<ChatMessage> {
        std::mem::take(&mut self.messages).into()
    }

    /// Discards every buffered message, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.messages.len();
        self.messages.clear();
        dropped
    }

    /// Discards everything and rejects further appends. Returns how many were dropped.
    pub fn close(&mut self) -> usize {
        self.closed = true;
        self.clear()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Changes the capacity, evicting from the head if the buffer is now over it.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.trim();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn trim(&mut self) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }
}
