//! Modal dialog and the page scroll lock it holds while open.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use super::Key;

/// Shared page scroll lock. Any number of holders may lock the page; it
/// unlocks when the last guard is dropped.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Rc<Cell<usize>>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        self.holders.set(self.holders.get() + 1);
        ScrollLockGuard {
            holders: self.holders.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Rc<Cell<usize>>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
    }
}

#[derive(Debug)]
pub struct Modal {
    lock: ScrollLock,
    guard: Option<ScrollLockGuard>,
}

impl Modal {
    pub fn new(lock: ScrollLock) -> Self {
        Self { lock, guard: None }
    }

    pub fn is_open(&self) -> bool {
        self.guard.is_some()
    }

    pub fn open(&mut self) {
        if self.guard.is_none() {
            self.guard = Some(self.lock.acquire());
            debug!("modal opened");
        }
    }

    pub fn close(&mut self) {
        if self.guard.take().is_some() {
            debug!("modal closed");
        }
    }

    pub fn key(&mut self, key: Key) {
        if key == Key::Escape {
            self.close();
        }
    }

    /// Click on the backdrop outside the dialog.
    pub fn click_overlay(&mut self) {
        self.close();
    }
}
