//! TTL arithmetic shared by both cache backends.
//!
//! One implementation so the backends cannot drift: a digest is fresh when
//! TTL filtering is disabled (`ttl_hours <= 0`), when its age is within the
//! window, or when the stored timestamp no longer parses (fail open —
//! serving a possibly stale digest beats erroring on our own data).

use chrono::{DateTime, Utc};

/// Whether a digest created at `created_at` (RFC 3339 text) is still fresh.
#[must_use]
pub fn within_ttl(created_at: &str, ttl_hours: i64, now: DateTime<Utc>) -> bool {
    if ttl_hours <= 0 {
        return true;
    }
    let Ok(created) = DateTime::parse_from_rfc3339(created_at) else {
        return true;
    };
    now - created.with_timezone(&Utc) <= chrono::Duration::hours(ttl_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, hour, 0, 0).unwrap()
    }

    #[test]
    fn fresh_inside_window() {
        let created = at(0).to_rfc3339();
        assert!(within_ttl(&created, 6, at(5)));
    }

    #[test]
    fn fresh_exactly_at_boundary() {
        let created = at(0).to_rfc3339();
        assert!(within_ttl(&created, 6, at(6)), "now - created == ttl is fresh");
    }

    #[test]
    fn stale_past_boundary() {
        let created = at(0).to_rfc3339();
        assert!(!within_ttl(&created, 6, at(7)));
    }

    #[test]
    fn ttl_disabled_is_always_fresh() {
        let created = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap().to_rfc3339();
        assert!(within_ttl(&created, 0, at(12)));
        assert!(within_ttl(&created, -1, at(12)));
    }

    #[test]
    fn unparsable_timestamp_fails_open() {
        assert!(within_ttl("not-a-timestamp", 6, at(12)));
        assert!(within_ttl("", 6, at(12)));
    }
}
