use chrono::{DateTime, Duration, NaiveTime, Utc};
use common::constant::FUNDING_INTERVAL_HOURS;

/// Next 00:00 / 08:00 / 16:00 UTC settlement strictly after `now`.
pub fn next_funding_time(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let mut next = midnight + Duration::hours(FUNDING_INTERVAL_HOURS);
    while next <= now {
        next += Duration::hours(FUNDING_INTERVAL_HOURS);
    }
    next
}

/// Time left until the next funding settlement.
pub fn funding_countdown(now: DateTime<Utc>) -> Duration {
    next_funding_time(now) - now
}

/// `HH:MM:SS`, hours not wrapped at 24. Negative spans render as zero.
pub fn format_countdown(remaining: Duration) -> String {
    let total_seconds = remaining.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
