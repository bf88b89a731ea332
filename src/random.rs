//! Cryptographically secure randomness for certificate fields.
//!
//! Every value produced here is drawn from the operating system's entropy
//! source via [`OsRng`]. Read failures propagate as [`RandCertError::Entropy`]
//! rather than degrading into low-entropy or zeroed output.

use crate::error::{RandCertError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use time::{Date, Duration, OffsetDateTime};

/// The 62-character alphanumeric alphabet used for identity fields.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Historical window (in days) from which validity start dates are drawn.
const START_WINDOW_DAYS: u64 = 356 * 3;

/// Fill a buffer from the OS entropy source.
fn fill(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| RandCertError::Entropy(format!("Failed to read random bytes: {}", e)))
}

/// Return `n` cryptographically random bytes.
pub fn rand_bytes(n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    fill(&mut buf)?;
    Ok(buf)
}

/// Return a uniform integer in `[0, bound)`.
///
/// Uses rejection sampling: draws above the largest multiple of `bound`
/// that fits in a `u64` are discarded, so the result carries no modulo bias.
pub fn rand_int(bound: u64) -> Result<u64> {
    if bound == 0 {
        return Err(RandCertError::InvalidInput(
            "bound must be non-zero".to_string(),
        ));
    }

    let zone = u64::MAX - u64::MAX % bound;
    loop {
        let mut buf = [0u8; 8];
        fill(&mut buf)?;
        let v = u64::from_be_bytes(buf);
        if v < zone {
            return Ok(v % bound);
        }
    }
}

/// Return a random alphanumeric string with length uniform in `[min_len, max_len)`.
///
/// Each character is an unbiased draw from [`ALPHABET`]; reducing raw bytes
/// modulo 62 would skew selection toward the start of the alphabet.
///
/// # Example
///
/// ```
/// use randcert::random::rand_string;
///
/// let s = rand_string(4, 16).unwrap();
/// assert!(s.len() >= 4 && s.len() < 16);
/// assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn rand_string(min_len: usize, max_len: usize) -> Result<String> {
    if min_len >= max_len {
        return Err(RandCertError::InvalidInput(format!(
            "Invalid length bounds: [{}, {})",
            min_len, max_len
        )));
    }

    let len = min_len + rand_int((max_len - min_len) as u64)? as usize;
    let mut s = String::with_capacity(len);
    for _ in 0..len {
        let idx = rand_int(ALPHABET.len() as u64)? as usize;
        s.push(ALPHABET[idx] as char);
    }
    Ok(s)
}

/// Return serial-number material: a uniform 128-bit integer.
///
/// The top bit is cleared so the DER INTEGER encoding stays positive, as
/// RFC 5280 requires of serial numbers.
pub fn rand_serial() -> Result<[u8; 16]> {
    let mut buf = [0u8; 16];
    fill(&mut buf)?;
    buf[0] &= 0x7F;
    Ok(buf)
}

/// Return a randomized validity window `(not_before, not_after)`.
///
/// The start falls within the past [`START_WINDOW_DAYS`] on a random hour
/// between 06:00 and 23:00 UTC with minutes and seconds zeroed. The end is
/// a whole number of years (1 through 9) after the start.
pub fn rand_validity() -> Result<(OffsetDateTime, OffsetDateTime)> {
    let days = rand_int(START_WINDOW_DAYS)? as i64;
    let hour = 6 + rand_int(24 - 6)? as u8;
    let years = 1 + rand_int(9)? as i32;

    let start_date = OffsetDateTime::now_utc().date() - Duration::days(days);
    let start = start_date
        .with_hms(hour, 0, 0)
        .map_err(|e| RandCertError::InvalidInput(format!("Invalid start time: {}", e)))?
        .assume_utc();

    let end = add_years(start_date, years)?
        .with_hms(hour, 0, 0)
        .map_err(|e| RandCertError::InvalidInput(format!("Invalid end time: {}", e)))?
        .assume_utc();

    Ok((start, end))
}

/// Calendar-year addition with a Feb 29 -> Feb 28 clamp for non-leap targets.
fn add_years(date: Date, years: i32) -> Result<Date> {
    let year = date.year() + years;
    Date::from_calendar_date(year, date.month(), date.day())
        .or_else(|_| Date::from_calendar_date(year, date.month(), 28))
        .map_err(|e| RandCertError::InvalidInput(format!("Invalid validity date: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand_bytes_length_and_variation() {
        let a = rand_bytes(32).unwrap();
        let b = rand_bytes(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(b.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_rand_int_within_bound() {
        for _ in 0..1000 {
            let v = rand_int(7).unwrap();
            assert!(v < 7);
        }
    }

    #[test]
    fn test_rand_int_zero_bound_rejected() {
        assert!(rand_int(0).is_err());
    }

    #[test]
    fn test_rand_int_roughly_uniform() {
        // 8000 draws over 8 buckets; each bucket expects ~1000. A bucket
        // outside [800, 1200] is a > 6-sigma outlier.
        let mut buckets = [0u64; 8];
        for _ in 0..8000 {
            buckets[rand_int(8).unwrap() as usize] += 1;
        }
        for count in buckets {
            assert!((800..=1200).contains(&count), "skewed bucket: {}", count);
        }
    }

    #[test]
    fn test_rand_string_length_and_alphabet() {
        for _ in 0..100 {
            let s = rand_string(4, 16).unwrap();
            assert!(s.len() >= 4 && s.len() < 16);
            assert!(s.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_rand_string_invalid_bounds() {
        assert!(rand_string(16, 4).is_err());
        assert!(rand_string(4, 4).is_err());
    }

    #[test]
    fn test_rand_string_varies() {
        let a = rand_string(8, 9).unwrap();
        let b = rand_string(8, 9).unwrap();
        // 62^8 possibilities; a collision here means the source is broken.
        assert_ne!(a, b);
    }

    #[test]
    fn test_rand_serial_positive() {
        for _ in 0..100 {
            let serial = rand_serial().unwrap();
            assert_eq!(serial.len(), 16);
            assert_eq!(serial[0] & 0x80, 0);
        }
    }

    #[test]
    fn test_rand_validity_window_shape() {
        for _ in 0..50 {
            let (start, end) = rand_validity().unwrap();
            assert!(start < end);
            assert_eq!(start.minute(), 0);
            assert_eq!(start.second(), 0);
            assert!((6..24).contains(&start.hour()));
            assert_eq!(start.offset(), time::UtcOffset::UTC);

            let span = end - start;
            assert!(span >= Duration::days(364));
            assert!(span <= Duration::days(9 * 366));
        }
    }

    #[test]
    fn test_rand_validity_start_in_past_window() {
        let (start, _) = rand_validity().unwrap();
        let now = OffsetDateTime::now_utc();
        assert!(start <= now);
        assert!(now - start <= Duration::days(START_WINDOW_DAYS as i64 + 1));
    }

    #[test]
    fn test_add_years_clamps_leap_day() {
        let date = Date::from_calendar_date(2024, time::Month::February, 29).unwrap();
        let shifted = add_years(date, 1).unwrap();
        assert_eq!(
            shifted,
            Date::from_calendar_date(2025, time::Month::February, 28).unwrap()
        );
    }
}
