//! Brute-force lockout state machine.
//!
//! Applications move between two states per login attempt: `Active`
//! (counting failures) and `Locked` (hard 423 until the lock passes).
//! Reaching the threshold replaces the stored credential with a
//! system-issued temporary password, so the lock can only be exited with
//! the temporary credential once the window has elapsed. There is no
//! scheduled unlock; expiry is observed lazily on the next attempt.

use chrono::{DateTime, Duration, Utc};

/// Failed-attempt threshold that triggers a lock.
pub const MAX_FAILED_ATTEMPTS: i32 = 10;

/// How long a lock stays active once entered.
pub const LOCK_DURATION_MINUTES: i64 = 15;

/// Lockout state of an application at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    /// Failures are counted; login attempts are verified.
    Active,
    /// Attempts are rejected outright and not counted.
    Locked { until: DateTime<Utc> },
}

/// Evaluates the lockout state from the stored `locked_until` field.
pub fn lockout_state(locked_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> LockoutState {
    match locked_until {
        Some(until) if until > now => LockoutState::Locked { until },
        _ => LockoutState::Active,
    }
}

/// What a failed verification leads to, given the post-increment counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Persist the counter and answer with the generic 401.
    Count,
    /// Threshold reached: mint a temporary credential and lock.
    Lock,
}

/// Decides the action for a failed attempt whose increment produced
/// `new_count`.
pub fn on_failed_attempt(new_count: i32) -> FailureAction {
    if new_count >= MAX_FAILED_ATTEMPTS {
        FailureAction::Lock
    } else {
        FailureAction::Count
    }
}

/// The instant a lock entered now would expire.
pub fn lock_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(LOCK_DURATION_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_lock_is_active() {
        assert_eq!(lockout_state(None, Utc::now()), LockoutState::Active);
    }

    #[test]
    fn test_future_lock_is_locked() {
        let until = Utc::now() + Duration::minutes(5);
        assert_eq!(
            lockout_state(Some(until), Utc::now()),
            LockoutState::Locked { until }
        );
    }

    #[test]
    fn test_elapsed_lock_is_active_again() {
        let until = Utc::now() - Duration::seconds(1);
        assert_eq!(lockout_state(Some(until), Utc::now()), LockoutState::Active);
    }

    #[test]
    fn test_lock_boundary_is_active() {
        let now = Utc::now();
        assert_eq!(lockout_state(Some(now), now), LockoutState::Active);
    }

    #[test]
    fn test_attempts_below_threshold_count() {
        for count in 1..MAX_FAILED_ATTEMPTS {
            assert_eq!(on_failed_attempt(count), FailureAction::Count);
        }
    }

    #[test]
    fn test_tenth_attempt_locks() {
        assert_eq!(on_failed_attempt(MAX_FAILED_ATTEMPTS), FailureAction::Lock);
    }

    #[test]
    fn test_lock_expiry_duration() {
        let now = Utc::now();
        assert_eq!(lock_expiry(now) - now, Duration::minutes(15));
    }
}
