//! Report and voting window arithmetic.
//!
//! A report opens a 72-hour voting window and stays visible for 3 days.
//! Both windows are applied by the client when it filters `init-data`; the
//! server records `report_timestamp` but does not enforce them.

use chrono::{DateTime, Duration, Utc};

/// Hours after a report during which votes are accepted by the client.
pub const VOTING_WINDOW_HOURS: i64 = 72;

/// Days after a report during which it is still surfaced at all.
pub const REPORT_TTL_DAYS: i64 = 3;

/// Whether a report made at `reported_at` is still open for voting at `now`.
pub fn voting_open(reported_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= reported_at && now - reported_at <= Duration::hours(VOTING_WINDOW_HOURS)
}

/// Whether a report made at `reported_at` is still shown at `now`.
pub fn report_active(reported_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= reported_at && now - reported_at <= Duration::days(REPORT_TTL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voting_window_is_72_hours() {
        let reported = Utc::now();
        assert!(voting_open(reported, reported + Duration::hours(71)));
        assert!(voting_open(reported, reported + Duration::hours(72)));
        assert!(!voting_open(reported, reported + Duration::hours(73)));
    }

    #[test]
    fn report_expires_after_3_days() {
        let reported = Utc::now();
        assert!(report_active(reported, reported + Duration::days(2)));
        assert!(report_active(reported, reported + Duration::days(3)));
        assert!(!report_active(reported, reported + Duration::days(3) + Duration::hours(1)));
    }

    #[test]
    fn windows_reject_clock_skew() {
        let reported = Utc::now();
        let before = reported - Duration::minutes(5);
        assert!(!voting_open(reported, before));
        assert!(!report_active(reported, before));
    }
}
