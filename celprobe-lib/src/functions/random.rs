//! Pseudo-random generation for `randomInt` and `randomLowercase`.
//!
//! `randomInt` draws from one process-wide generator, seeded from the clock the first time
//! it is used and guarded by a mutex so concurrent evaluations can share it.
//!
//! `randomLowercase` builds a fresh generator on every call, seeded from the current
//! wall-clock second. Calls made within the same second therefore return the same string
//! for the same length. Rules that need distinct values per request must not rely on it.

use super::FunctionError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

static SHARED: LazyLock<Mutex<StdRng>> = LazyLock::new(|| Mutex::new(StdRng::seed_from_u64(clock_nanos())));

fn clock_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}

fn clock_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

/// A random integer in `[offset, offset + range)`.
///
/// `range` must be positive; that is the caller's responsibility, and a violation is
/// reported as an error rather than drawn from.
///
/// # Errors
///
/// Returns an error if `range` is not positive or the result would overflow.
pub fn random_int(range: i64, offset: i64) -> Result<i64, FunctionError> {
    if range <= 0 {
        return Err(FunctionError::InvalidArgument {
            function: "randomInt",
            reason: "range must be greater than zero",
        });
    }

    let drawn = SHARED.lock().unwrap_or_else(PoisonError::into_inner).random_range(0..range);

    offset.checked_add(drawn).ok_or(FunctionError::InvalidArgument {
        function: "randomInt",
        reason: "result overflows a 64-bit integer",
    })
}

/// A random string of `len` lowercase ASCII letters.
///
/// # Errors
///
/// Returns an error if `len` is negative.
pub fn random_lowercase(len: i64) -> Result<String, FunctionError> {
    let len = usize::try_from(len).ok().ok_or(FunctionError::InvalidArgument {
        function: "randomLowercase",
        reason: "length must not be negative",
    })?;

    let mut rng = StdRng::seed_from_u64(clock_seconds());
    Ok((0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_int_stays_in_range() {
        for _ in 0..1000 {
            let n = random_int(10, 5).unwrap();
            assert!((5..15).contains(&n), "{n} out of range");
        }
    }

    #[test]
    fn test_random_int_single_value_range() {
        assert_eq!(random_int(1, -7).unwrap(), -7);
    }

    #[test]
    fn test_random_int_rejects_non_positive_range() {
        assert!(random_int(0, 0).is_err());
        assert!(random_int(-3, 10).is_err());
    }

    #[test]
    fn test_random_int_at_upper_bound() {
        assert_eq!(random_int(1, i64::MAX).unwrap(), i64::MAX);
    }

    #[test]
    fn test_random_lowercase() {
        let s = random_lowercase(5).unwrap();
        assert_eq!(s.len(), 5);
        assert!(s.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_lowercase_empty_and_negative() {
        assert_eq!(random_lowercase(0).unwrap(), "");
        assert!(random_lowercase(-1).is_err());
    }
}
