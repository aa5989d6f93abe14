//! Toast notifications
//!
//! A toast shows for `display`, then plays a `exit` slide-out before it is
//! removed. [`ToastStack`] caps how many are on screen at once.

use std::collections::VecDeque;
use std::time::Duration;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    /// Background colour of the toast
    pub fn color(self) -> &'static str {
        match self {
            Severity::Success => "#238636",
            Severity::Error => "#da3633",
            Severity::Info => "#1f6feb",
        }
    }

    /// Class name added next to `notification`
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

/// A transient notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub display: Duration,
    pub exit: Duration,
}

/// Where a new toast goes on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Vertical position, 0 at the top
    pub slot: usize,
    /// Toasts that must be removed to stay under the cap
    pub evicted: Vec<u64>,
}

/// Live toasts in arrival order, oldest first, each with its slot
#[derive(Debug)]
pub struct ToastStack {
    live: VecDeque<(u64, usize)>,
    cap: usize,
}

impl ToastStack {
    pub fn new(cap: usize) -> Self {
        Self {
            live: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Register a toast in the lowest free slot, evicting the oldest over the cap
    pub fn push(&mut self, id: u64) -> Placement {
        let mut evicted = Vec::new();
        while self.live.len() >= self.cap {
            match self.live.pop_front() {
                Some((oldest, _)) => evicted.push(oldest),
                None => break,
            }
        }

        let slot = (0..self.cap)
            .find(|slot| self.live.iter().all(|(_, used)| used != slot))
            .unwrap_or(0);
        self.live.push_back((id, slot));
        Placement { slot, evicted }
    }

    /// Forget a toast whose exit animation finished
    pub fn remove(&mut self, id: u64) {
        self.live.retain(|(live, _)| *live != id);
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Success.color(), "#238636");
        assert_eq!(Severity::Error.color(), "#da3633");
        assert_eq!(Severity::Info.color(), "#1f6feb");
        assert_eq!(Severity::Error.as_str(), "error");
    }

    #[test]
    fn test_stack_evicts_oldest_over_cap() {
        let mut stack = ToastStack::new(2);
        assert!(stack.push(1).evicted.is_empty());
        assert!(stack.push(2).evicted.is_empty());
        let third = stack.push(3);
        assert_eq!(third.evicted, vec![1]);
        assert_eq!(third.slot, 0);
        assert_eq!(stack.len(), 2);

        stack.remove(2);
        stack.remove(99);
        assert_eq!(stack.len(), 1);
        assert!(stack.push(4).evicted.is_empty());
    }

    #[test]
    fn test_expired_slot_is_reused_without_overlap() {
        let mut stack = ToastStack::new(5);
        assert_eq!(stack.push(1).slot, 0);
        assert_eq!(stack.push(2).slot, 1);

        stack.remove(1);
        assert_eq!(stack.push(3).slot, 0);
        assert_eq!(stack.push(4).slot, 2);

        stack.remove(2);
        assert_eq!(stack.push(5).slot, 1);
    }

    #[test]
    fn test_zero_cap_keeps_one() {
        let mut stack = ToastStack::new(0);
        assert!(stack.push(1).evicted.is_empty());
        let second = stack.push(2);
        assert_eq!(second.evicted, vec![1]);
        assert_eq!(second.slot, 0);
        assert!(!stack.is_empty());
    }
}
