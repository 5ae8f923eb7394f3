use chrono::{DateTime, Duration, Utc};

/// Source of "now". Everything that stamps or compares wall-clock time takes one,
/// so tests can drive time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats an elapsed duration as `1d 2h 3m 4s`.
/// Zero-valued day/hour/minute units are left out; seconds are always shown.
pub fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}d "));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}h "));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m "));
    }
    out.push_str(&format!("{seconds}s"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_only() {
        assert_eq!(format_uptime(Duration::seconds(0)), "0s");
        assert_eq!(format_uptime(Duration::seconds(59)), "59s");
    }

    #[test]
    fn all_units() {
        let d = Duration::days(1) + Duration::hours(2) + Duration::minutes(3) + Duration::seconds(4);
        assert_eq!(format_uptime(d), "1d 2h 3m 4s");
    }

    #[test]
    fn zero_units_are_skipped() {
        let d = Duration::days(2) + Duration::minutes(5);
        assert_eq!(format_uptime(d), "2d 5m 0s");
        assert_eq!(format_uptime(Duration::hours(3)), "3h 0s");
    }

    #[test]
    fn negative_elapsed_clamps_to_zero() {
        assert_eq!(format_uptime(Duration::seconds(-5)), "0s");
    }
}
