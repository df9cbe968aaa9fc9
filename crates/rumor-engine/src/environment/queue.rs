//! Delivery Queue
//!
//! FIFO router used by runs. Sending only enqueues, so an agent's own
//! deliberation can never be re-entered by the messages it sends.

use std::collections::VecDeque;

use rumor_types::Message;

/// Accepts messages bound for other agents
pub trait Router {
    fn send_message(&mut self, message: Message);
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryQueue {
    pending: VecDeque<Message>,
}

impl DeliveryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<Message> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Router for DeliveryQueue {
    fn send_message(&mut self, message: Message) {
        self.pending.push_back(message);
    }
}
