//! Availability windows for assignments and other dated items.
//!
//! Both bounds are inclusive and either may be absent. "Now" is always passed
//! in by the caller, nothing in here reads the clock.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where `now` falls relative to an availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    Upcoming,
    Open,
    Closed,
}

/// Returns true if an item with the given bounds can be seen at `now`.
pub fn is_visible(
    now: DateTime<Utc>,
    available_from: Option<DateTime<Utc>>,
    available_to: Option<DateTime<Utc>>,
) -> bool {
    available_from.is_none_or(|from| from <= now) && available_to.is_none_or(|to| to >= now)
}

/// Classifies `now` against the window. `Open` exactly when [`is_visible`] holds.
pub fn window_status(
    now: DateTime<Utc>,
    available_from: Option<DateTime<Utc>>,
    available_to: Option<DateTime<Utc>>,
) -> WindowStatus {
    if available_from.is_some_and(|from| from > now) {
        WindowStatus::Upcoming
    } else if available_to.is_some_and(|to| to < now) {
        WindowStatus::Closed
    } else {
        WindowStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn unbounded_window_is_always_visible() {
        assert!(is_visible(now(), None, None));
        assert!(is_visible(DateTime::<Utc>::MIN_UTC, None, None));
        assert!(is_visible(DateTime::<Utc>::MAX_UTC, None, None));
    }

    #[test]
    fn future_start_hides_item() {
        let from = now() + Duration::days(1);
        assert!(!is_visible(now(), Some(from), None));
        assert_eq!(window_status(now(), Some(from), None), WindowStatus::Upcoming);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(is_visible(now(), Some(now()), Some(now())));
    }

    #[test]
    fn past_end_closes_window() {
        let to = now() - Duration::minutes(1);
        assert!(!is_visible(now(), None, Some(to)));
        assert_eq!(window_status(now(), None, Some(to)), WindowStatus::Closed);
    }

    #[test]
    fn widening_bounds_never_hides_a_visible_item() {
        let offsets = [-3i64, -1, 0, 1, 3];
        for from_off in offsets {
            for to_off in offsets {
                let from = Some(now() + Duration::hours(from_off));
                let to = Some(now() + Duration::hours(to_off));
                if is_visible(now(), from, to) {
                    assert!(is_visible(now(), from.map(|f| f - Duration::days(1)), to));
                    assert!(is_visible(now(), from, to.map(|t| t + Duration::days(1))));
                    assert!(is_visible(now(), None, to));
                    assert!(is_visible(now(), from, None));
                }
            }
        }
    }

    #[test]
    fn status_matches_visibility() {
        let bounds = [None, Some(now() - Duration::hours(2)), Some(now() + Duration::hours(2))];
        for from in bounds {
            for to in bounds {
                let open = window_status(now(), from, to) == WindowStatus::Open;
                assert_eq!(open, is_visible(now(), from, to));
            }
        }
    }
}
