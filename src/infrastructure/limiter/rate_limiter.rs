use std::{collections::VecDeque, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};

use super::clock::{Clock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitPolicy {
    pub max_requests: usize,
    pub window_ms: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitPolicy {
            max_requests: 3,
            window_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: usize,
    /// When the oldest counted request leaves the window (epoch ms).
    pub reset_at_ms: i64,
    /// Whole seconds until a slot frees up, never less than one.
    pub retry_after_secs: u64,
}

/// Sliding-window limiter keyed by client identifier.
///
/// Each client owns an arrival-ordered queue of admission timestamps.
/// Rejected attempts are never recorded, and a client whose queue empties
/// is dropped from the map.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, VecDeque<i64>>>,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    pub fn with_clock(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        RateLimiter {
            windows: Arc::new(DashMap::new()),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    pub fn check(&self, client_id: &str) -> RateLimitDecision {
        let now = self.clock.now_millis();
        let window_start = now - self.policy.window_ms;

        // Sweep every tracked client so abandoned ones do not pile up.
        self.windows.retain(|_, stamps| {
            prune(stamps, window_start);
            !stamps.is_empty()
        });

        // The entry guard holds the shard lock, so check-and-append is atomic per client.
        match self.windows.entry(client_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let stamps = entry.get_mut();
                prune(stamps, window_start);

                if stamps.len() >= self.policy.max_requests {
                    let oldest = stamps.front().copied().unwrap_or(now);
                    return self.decision(false, 0, oldest, now);
                }

                stamps.push_back(now);
                let remaining = self.policy.max_requests - stamps.len();
                let oldest = stamps.front().copied().unwrap_or(now);
                self.decision(true, remaining, oldest, now)
            }
            Entry::Vacant(entry) => {
                if self.policy.max_requests == 0 {
                    return self.decision(false, 0, now, now);
                }
                entry.insert(VecDeque::from([now]));
                self.decision(true, self.policy.max_requests - 1, now, now)
            }
        }
    }

    /// Number of clients currently holding at least one timestamp.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    fn decision(&self, allowed: bool, remaining: usize, oldest: i64, now: i64) -> RateLimitDecision {
        let reset_at_ms = oldest + self.policy.window_ms;
        let wait_ms = (reset_at_ms - now).max(0) as u64;
        RateLimitDecision {
            allowed,
            remaining,
            reset_at_ms,
            retry_after_secs: wait_ms.div_ceil(1000).max(1),
        }
    }
}

fn prune(stamps: &mut VecDeque<i64>, window_start: i64) {
    while stamps.front().is_some_and(|&t| t <= window_start) {
        stamps.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::limiter::clock::ManualClock;

    const START: i64 = 1_700_000_000_000;

    fn limiter() -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(START));
        let limiter = RateLimiter::with_clock(RateLimitPolicy::default(), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn admits_n_requests_with_decreasing_remaining_then_rejects() {
        let (limiter, clock) = limiter();

        let remaining: Vec<usize> = (0..3)
            .map(|_| {
                let decision = limiter.check("10.0.0.1");
                assert!(decision.allowed);
                clock.advance(1_000);
                decision.remaining
            })
            .collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let rejected = limiter.check("10.0.0.1");
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(rejected.reset_at_ms, START + 60_000);
        assert_eq!(rejected.retry_after_secs, 57);
    }

    #[test]
    fn rejected_attempts_are_not_recorded() {
        let (limiter, clock) = limiter();
        for _ in 0..3 {
            limiter.check("c");
        }
        for _ in 0..5 {
            assert!(!limiter.check("c").allowed);
        }

        clock.advance(60_001);

        let decision = limiter.check("c");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
    }

    #[test]
    fn throttled_client_is_admitted_again_after_the_window() {
        let (limiter, clock) = limiter();
        for _ in 0..4 {
            limiter.check("c");
        }

        clock.advance(60_000);
        // Timestamps exactly at the window start count as expired.
        let decision = limiter.check("c");

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
    }

    #[test]
    fn window_slides_instead_of_resetting() {
        let (limiter, clock) = limiter();
        limiter.check("c");
        clock.advance(30_000);
        limiter.check("c");
        limiter.check("c");
        clock.advance(30_001);

        // Only the first request aged out.
        let decision = limiter.check("c");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert!(!limiter.check("c").allowed);
    }

    #[test]
    fn clients_are_isolated() {
        let (limiter, _clock) = limiter();
        for _ in 0..3 {
            limiter.check("a");
        }

        assert!(!limiter.check("a").allowed);
        assert_eq!(limiter.check("b").remaining, 2);
    }

    #[test]
    fn expired_clients_are_removed_from_the_map() {
        let (limiter, clock) = limiter();
        limiter.check("a");
        limiter.check("b");
        assert_eq!(limiter.tracked_clients(), 2);

        clock.advance(61_000);
        limiter.check("c");

        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn retry_after_is_at_least_one_second() {
        let (limiter, clock) = limiter();
        for _ in 0..3 {
            limiter.check("c");
        }
        clock.advance(59_999);

        assert_eq!(limiter.check("c").retry_after_secs, 1);
    }

    #[test]
    fn concurrent_checks_never_exceed_quota() {
        let (limiter, _clock) = limiter();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || limiter.check("shared").allowed)
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(admitted, 3);
    }
}
