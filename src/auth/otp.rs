//! One-time verification codes
//!
//! 6-digit numeric codes for email verification, valid for 10 minutes.

use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};

/// Code lifetime
pub const OTP_TTL_MINUTES: i64 = 10;

/// Generate a 6-digit code (100000..=999999)
pub fn generate_otp() -> String {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 4];
    // On RNG failure fall back to a time-derived code rather than
    // blocking registration
    let n = if rng.fill(&mut bytes).is_ok() {
        u32::from_be_bytes(bytes)
    } else {
        Utc::now().timestamp_subsec_nanos()
    };
    format!("{}", 100_000 + n % 900_000)
}

/// Expiry timestamp for a code generated now
pub fn expiry_from_now() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(OTP_TTL_MINUTES)
}

/// Constant-shape check: code matches and has not expired
pub fn verify(
    stored_code: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
    submitted: &str,
) -> bool {
    let (Some(code), Some(expires)) = (stored_code, expires_at) else {
        return false;
    };
    code == submitted && Utc::now() < expires
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn verify_accepts_matching_unexpired_code() {
        let expires = Utc::now() + Duration::minutes(5);
        assert!(verify(Some("123456"), Some(expires), "123456"));
    }

    #[test]
    fn verify_rejects_wrong_expired_or_absent() {
        let future = Utc::now() + Duration::minutes(5);
        let past = Utc::now() - Duration::minutes(1);
        assert!(!verify(Some("123456"), Some(future), "654321"));
        assert!(!verify(Some("123456"), Some(past), "123456"));
        assert!(!verify(None, Some(future), "123456"));
        assert!(!verify(Some("123456"), None, "123456"));
    }
}
