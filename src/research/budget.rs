//! Shared run-wide invocation budget.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Global reasoning/tool invocation budget for one orchestration run,
/// optionally bounded by a wall-clock deadline.
///
/// Workers and the supervisor call [`RunBudget::try_acquire`] before each
/// cycle; once it refuses, in-flight work finishes its current cycle but
/// starts no new one. This is the cooperative cancellation point: there
/// is no forceful termination, so partially gathered evidence is never
/// discarded.
pub struct RunBudget {
    max_calls: u32,
    used: AtomicU32,
    deadline: Option<Instant>,
}

impl RunBudget {
    /// Create a budget of `max_calls` invocations, optionally expiring
    /// `wall_clock` from now.
    pub fn new(max_calls: u32, wall_clock: Option<Duration>) -> Self {
        Self {
            max_calls,
            used: AtomicU32::new(0),
            deadline: wall_clock.map(|limit| Instant::now() + limit),
        }
    }

    /// Reserve one invocation. Returns `false` once the budget or the
    /// deadline is exhausted; the counter never exceeds the ceiling.
    pub fn try_acquire(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                (used < self.max_calls).then_some(used + 1)
            })
            .is_ok()
    }

    /// Whether no further invocation can be acquired.
    pub fn exhausted(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        self.used.load(Ordering::SeqCst) >= self.max_calls
    }

    /// Invocations acquired so far.
    pub fn used(&self) -> u32 {
        self.used.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_caps_acquisitions() {
        let budget = RunBudget::new(2, None);
        assert!(budget.try_acquire());
        assert!(budget.try_acquire());
        assert!(!budget.try_acquire());
        assert_eq!(budget.used(), 2);
        assert!(budget.exhausted());
    }

    #[test]
    fn test_expired_deadline_refuses() {
        let budget = RunBudget::new(10, Some(Duration::ZERO));
        assert!(!budget.try_acquire());
        assert!(budget.exhausted());
        assert_eq!(budget.used(), 0);
    }

    #[test]
    fn test_concurrent_acquisitions_never_overshoot() {
        use std::sync::Arc;

        let budget = Arc::new(RunBudget::new(50, None));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let budget = Arc::clone(&budget);
            handles.push(std::thread::spawn(move || {
                let mut granted = 0u32;
                for _ in 0..20 {
                    if budget.try_acquire() {
                        granted += 1;
                    }
                }
                granted
            }));
        }

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 50);
        assert_eq!(budget.used(), 50);
    }
}
