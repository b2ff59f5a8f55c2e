use std::collections::VecDeque;

use super::resource::Acquisition;
use crate::utils::errors::SimulationError;

/// A bounded stock of discrete units.  `get` waits while the level is too
/// low and `put` waits while there is not enough room.  Waiters on each
/// side are served strictly in arrival order: a head waiter that cannot be
/// fully satisfied blocks everyone behind it, and is never partially served.
#[derive(Debug, Clone)]
pub struct Container<P> {
    capacity: usize,
    level: usize,
    get_queue: VecDeque<(P, usize)>,
    put_queue: VecDeque<(P, usize)>,
}

/// The result of a container operation - the requester's own acquisition,
/// plus every waiter on the opposite side that the operation satisfied.
#[derive(Debug, Clone)]
pub struct Transfer<P> {
    pub acquisition: Acquisition,
    pub satisfied: Vec<P>,
}

impl<P> Container<P> {
    pub fn new(capacity: usize, level: usize) -> Result<Self, SimulationError> {
        if level > capacity {
            return Err(SimulationError::ContainerOverflow);
        }
        Ok(Self {
            capacity,
            level,
            get_queue: VecDeque::new(),
            put_queue: VecDeque::new(),
        })
    }

    /// A container that starts out full.
    pub fn full(capacity: usize) -> Self {
        Self {
            capacity,
            level: capacity,
            get_queue: VecDeque::new(),
            put_queue: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn waiting_gets(&self) -> usize {
        self.get_queue.len()
    }

    fn validate(&self, amount: usize) -> Result<(), SimulationError> {
        if amount == 0 || amount > self.capacity {
            Err(SimulationError::InvalidContainerRequest {
                requested: amount,
                capacity: self.capacity,
            })
        } else {
            Ok(())
        }
    }

    /// Withdraw `amount` units, or queue until they are available.
    pub fn get(&mut self, requester: P, amount: usize) -> Result<Transfer<P>, SimulationError> {
        self.validate(amount)?;
        if self.get_queue.is_empty() && self.level >= amount {
            self.level -= amount;
            Ok(Transfer {
                acquisition: Acquisition::Granted,
                satisfied: self.serve_puts(),
            })
        } else {
            self.get_queue.push_back((requester, amount));
            Ok(Transfer {
                acquisition: Acquisition::Queued,
                satisfied: Vec::new(),
            })
        }
    }

    /// Deposit `amount` units, or queue until there is room for them.
    pub fn put(&mut self, requester: P, amount: usize) -> Result<Transfer<P>, SimulationError> {
        self.validate(amount)?;
        if self.put_queue.is_empty() && self.level + amount <= self.capacity {
            self.level += amount;
            Ok(Transfer {
                acquisition: Acquisition::Granted,
                satisfied: self.serve_gets(),
            })
        } else {
            self.put_queue.push_back((requester, amount));
            Ok(Transfer {
                acquisition: Acquisition::Queued,
                satisfied: Vec::new(),
            })
        }
    }

    fn serve_gets(&mut self) -> Vec<P> {
        let mut satisfied = Vec::new();
        while let Some((_, amount)) = self.get_queue.front() {
            if *amount > self.level {
                break;
            }
            if let Some((requester, amount)) = self.get_queue.pop_front() {
                self.level -= amount;
                satisfied.push(requester);
            }
        }
        // Withdrawals may have made room for queued deposits
        if !satisfied.is_empty() {
            satisfied.extend(self.serve_puts());
        }
        satisfied
    }

    fn serve_puts(&mut self) -> Vec<P> {
        let mut satisfied = Vec::new();
        while let Some((_, amount)) = self.put_queue.front() {
            if self.level + *amount > self.capacity {
                break;
            }
            if let Some((requester, amount)) = self.put_queue.pop_front() {
                self.level += amount;
                satisfied.push(requester);
            }
        }
        if !satisfied.is_empty() {
            satisfied.extend(self.serve_gets());
        }
        satisfied
    }
}
