//! In-process lock and request log. Clones share state, so several limiters
//! built from clones behave like processes sharing one lock file.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local};

use super::error::RateError;
use super::lock::AdvisoryLock;
use super::log::RequestLog;

#[derive(Debug, Default)]
struct LockState {
    held: bool,
    refusals: usize,
    attempts: usize,
}

#[derive(Debug, Default)]
pub struct MemoryLock {
    state: Rc<RefCell<LockState>>,
    held: bool,
}

impl MemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the next `n` attempts from any handle, as if another process held the lock.
    pub fn refuse_next(&self, n: usize) {
        self.state.borrow_mut().refusals = n;
    }

    /// Total acquisition attempts across all handles.
    pub fn attempts(&self) -> usize {
        self.state.borrow().attempts
    }

    pub fn is_locked(&self) -> bool {
        self.state.borrow().held
    }
}

impl Clone for MemoryLock {
    /// A new handle on the same lock; the clone does not hold it.
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            held: false,
        }
    }
}

impl AdvisoryLock for MemoryLock {
    fn try_acquire(&mut self) -> Result<bool, RateError> {
        if self.held {
            return Ok(true);
        }
        let mut state = self.state.borrow_mut();
        state.attempts += 1;
        if state.refusals > 0 {
            state.refusals -= 1;
            return Ok(false);
        }
        if state.held {
            return Ok(false);
        }
        state.held = true;
        self.held = true;
        Ok(true)
    }

    fn release(&mut self) -> Result<(), RateError> {
        if self.held {
            self.state.borrow_mut().held = false;
            self.held = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRequestLog {
    stamps: Rc<RefCell<Vec<DateTime<Local>>>>,
}

impl MemoryRequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stamps(stamps: Vec<DateTime<Local>>) -> Self {
        Self {
            stamps: Rc::new(RefCell::new(stamps)),
        }
    }

    pub fn stamps(&self) -> Vec<DateTime<Local>> {
        self.stamps.borrow().clone()
    }
}

impl RequestLog for MemoryRequestLog {
    fn read(&mut self) -> Result<Vec<DateTime<Local>>, RateError> {
        Ok(self.stamps())
    }

    fn write(&mut self, stamps: &[DateTime<Local>]) -> Result<(), RateError> {
        *self.stamps.borrow_mut() = stamps.to_vec();
        Ok(())
    }
}
