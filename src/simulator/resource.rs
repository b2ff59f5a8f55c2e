use std::collections::VecDeque;

use crate::utils::errors::SimulationError;

/// The outcome of a blocking request on a `Resource` or a `Container`.
/// A queued requester is resumed by whoever later satisfies the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    Granted,
    Queued,
}

/// A capacity-limited mutual exclusion primitive.  Requests beyond the
/// capacity wait in a FIFO queue, and a release hands the freed slot
/// straight to the head of that queue.
#[derive(Debug, Clone)]
pub struct Resource<P> {
    capacity: usize,
    holders: usize,
    queue: VecDeque<P>,
}

impl<P> Resource<P> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            holders: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn holders(&self) -> usize {
        self.holders
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Grant a slot immediately if one is vacant, otherwise enqueue the
    /// requester behind every earlier request.
    pub fn request(&mut self, requester: P) -> Acquisition {
        if self.holders < self.capacity && self.queue.is_empty() {
            self.holders += 1;
            Acquisition::Granted
        } else {
            self.queue.push_back(requester);
            Acquisition::Queued
        }
    }

    /// Release one held slot.  When a requester is waiting, the slot passes
    /// to it without ever becoming vacant, and that requester is returned so
    /// the caller can resume it.
    pub fn release(&mut self) -> Result<Option<P>, SimulationError> {
        if self.holders == 0 {
            return Err(SimulationError::ResourceNotHeld);
        }
        match self.queue.pop_front() {
            Some(next) => Ok(Some(next)),
            None => {
                self.holders -= 1;
                Ok(None)
            }
        }
    }
}
