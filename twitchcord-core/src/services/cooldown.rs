use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::debug;

use crate::utils::time::{Clock, SystemClock};

/// Above this many keys, expired entries are swept on the next stamp.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownResult {
    /// The caller may proceed; the current time has been stamped for the key.
    NotOnCooldown,
    /// Still cooling down. Always at least 1.
    OnCooldown { remaining_seconds: i64 },
}

impl CooldownResult {
    pub fn is_on_cooldown(&self) -> bool {
        matches!(self, CooldownResult::OnCooldown { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Stamp {
    at: DateTime<Utc>,
    window: Duration,
}

impl Stamp {
    fn expiry(&self) -> DateTime<Utc> {
        self.at + self.window
    }
}

/// Per-(command, user) rate limiter.
///
/// Stamping only happens when a call is let through, so spamming a command during its
/// window does not extend the window.
pub struct CooldownTracker {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<(String, String), Stamp>>,
    max_entries: usize,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl CooldownTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity_bound(clock, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity_bound(clock: Arc<dyn Clock>, max_entries: usize) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
            max_entries,
        }
    }

    pub fn check_and_stamp(&self, command: &str, user_id: &str, window: Duration) -> CooldownResult {
        let now = self.clock.now();
        let key = (command.to_lowercase(), user_id.to_string());

        let mut entries = self.entries.lock();
        if let Some(stamp) = entries.get(&key) {
            let expiry = stamp.expiry();
            if now < expiry {
                let remaining_ms = (expiry - now).num_milliseconds();
                // ceil to whole seconds
                let remaining_seconds = ((remaining_ms + 999) / 1000).max(1);
                return CooldownResult::OnCooldown { remaining_seconds };
            }
        }

        entries.insert(key, Stamp { at: now, window });

        if entries.len() > self.max_entries {
            let before = entries.len();
            entries.retain(|_, stamp| stamp.expiry() > now);
            debug!("Cooldown sweep removed {} expired entries", before - entries.len());
        }

        CooldownResult::NotOnCooldown
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ManualClock;

    fn tracker() -> (Arc<ManualClock>, CooldownTracker) {
        let clock = Arc::new(ManualClock::default());
        let tracker = CooldownTracker::new(clock.clone());
        (clock, tracker)
    }

    #[test]
    fn first_call_is_never_on_cooldown() {
        let (_clock, tracker) = tracker();
        assert_eq!(
            tracker.check_and_stamp("quote", "alice", Duration::seconds(30)),
            CooldownResult::NotOnCooldown
        );
    }

    #[test]
    fn remaining_seconds_decrease_and_stay_in_range() {
        let (clock, tracker) = tracker();
        let window = Duration::seconds(30);
        tracker.check_and_stamp("quote", "alice", window);

        let mut last = i64::MAX;
        for step_ms in [0, 400, 1_500, 10_000, 29_000, 29_999] {
            clock.set_offset(Duration::milliseconds(step_ms));
            match tracker.check_and_stamp("quote", "alice", window) {
                CooldownResult::OnCooldown { remaining_seconds } => {
                    assert!((1..=30).contains(&remaining_seconds), "got {remaining_seconds}");
                    assert!(remaining_seconds <= last);
                    last = remaining_seconds;
                }
                other => panic!("expected cooldown at +{step_ms}ms, got {other:?}"),
            }
        }
        assert_eq!(last, 1);
    }

    #[test]
    fn spamming_does_not_extend_window() {
        let (clock, tracker) = tracker();
        let window = Duration::seconds(30);
        tracker.check_and_stamp("quote", "alice", window);

        clock.advance(Duration::seconds(20));
        assert!(tracker.check_and_stamp("quote", "alice", window).is_on_cooldown());

        clock.advance(Duration::seconds(10));
        assert_eq!(
            tracker.check_and_stamp("quote", "alice", window),
            CooldownResult::NotOnCooldown
        );
    }

    #[test]
    fn keys_do_not_interfere() {
        let (_clock, tracker) = tracker();
        let window = Duration::seconds(30);
        tracker.check_and_stamp("quote", "alice", window);

        assert!(!tracker.check_and_stamp("quote", "bob", window).is_on_cooldown());
        assert!(!tracker.check_and_stamp("dice", "alice", window).is_on_cooldown());
        assert!(tracker.check_and_stamp("QUOTE", "alice", window).is_on_cooldown());
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let clock = Arc::new(ManualClock::default());
        let tracker = CooldownTracker::with_capacity_bound(clock.clone(), 2);

        tracker.check_and_stamp("quote", "a", Duration::seconds(5));
        tracker.check_and_stamp("quote", "b", Duration::seconds(60));
        clock.advance(Duration::seconds(10));
        tracker.check_and_stamp("quote", "c", Duration::seconds(60));

        assert_eq!(tracker.len(), 2);
        assert!(tracker.check_and_stamp("quote", "b", Duration::seconds(60)).is_on_cooldown());
        assert!(!tracker.check_and_stamp("quote", "a", Duration::seconds(5)).is_on_cooldown());
    }
}
