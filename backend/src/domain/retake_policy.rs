//! Retake cooldown: a retake may only be granted once 12 hours have passed
//! since the student's last approval.

use chrono::{DateTime, TimeDelta, Utc};

/// Minimum hours between an approval and a retake grant.
pub const RETAKE_COOLDOWN_HOURS: i64 = 12;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Outcome of checking the cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetakeDecision {
    /// The window has elapsed (or there was no prior approval).
    Granted,
    /// Still inside the window; `remaining_hours` is rounded up and lies in
    /// `1..=12`.
    CoolingDown { remaining_hours: u32 },
}

/// Decide whether a retake may be granted at `now`.
///
/// An approval stamped in the future (clock skew between writers) is treated
/// as if it happened just now.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, Utc};
/// use invigilation::domain::{RetakeDecision, evaluate_retake};
///
/// let now = Utc::now();
/// assert_eq!(
///     evaluate_retake(Some(now - TimeDelta::minutes(90)), now),
///     RetakeDecision::CoolingDown { remaining_hours: 11 }
/// );
/// assert_eq!(evaluate_retake(None, now), RetakeDecision::Granted);
/// ```
#[must_use]
pub fn evaluate_retake(last_approved_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> RetakeDecision {
    let Some(last_approved_at) = last_approved_at else {
        return RetakeDecision::Granted;
    };
    let cooldown = TimeDelta::hours(RETAKE_COOLDOWN_HOURS);
    let elapsed = now - last_approved_at;
    if elapsed >= cooldown {
        return RetakeDecision::Granted;
    }

    let remaining_millis = (cooldown - elapsed).num_milliseconds();
    let rounded_up = (remaining_millis + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR;
    let clamped = rounded_up.clamp(1, RETAKE_COOLDOWN_HOURS);
    RetakeDecision::CoolingDown {
        remaining_hours: u32::try_from(clamped).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 10, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[rstest]
    #[case(TimeDelta::zero(), 12)]
    #[case(TimeDelta::seconds(1), 12)]
    #[case(TimeDelta::hours(1), 11)]
    #[case(TimeDelta::hours(1) - TimeDelta::milliseconds(500), 12)]
    #[case(TimeDelta::minutes(61), 11)]
    #[case(TimeDelta::hours(11), 1)]
    #[case(TimeDelta::hours(12) - TimeDelta::milliseconds(1), 1)]
    fn rejects_inside_window(#[case] elapsed: TimeDelta, #[case] expected: u32) {
        assert_eq!(
            evaluate_retake(Some(now() - elapsed), now()),
            RetakeDecision::CoolingDown {
                remaining_hours: expected
            }
        );
    }

    #[rstest]
    #[case(TimeDelta::hours(12))]
    #[case(TimeDelta::hours(30))]
    fn grants_once_window_elapsed(#[case] elapsed: TimeDelta) {
        assert_eq!(
            evaluate_retake(Some(now() - elapsed), now()),
            RetakeDecision::Granted
        );
    }

    #[rstest]
    fn grants_without_prior_approval() {
        assert_eq!(evaluate_retake(None, now()), RetakeDecision::Granted);
    }

    #[rstest]
    fn future_approval_waits_the_full_window() {
        assert_eq!(
            evaluate_retake(Some(now() + TimeDelta::hours(3)), now()),
            RetakeDecision::CoolingDown {
                remaining_hours: 12
            }
        );
    }
}
