//! Password-reset OTP flow: issued -> pending-verification -> consumed-or-expired.
//!
//! The code is single use: verification clears both fields, so a second
//! attempt fails even with the correct digits.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const OTP_VALIDITY_MINUTES: i64 = 10;
pub const OTP_LENGTH: usize = 6;

/// Generates a 6-digit numeric code.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| rng.gen_range(0..10).to_string())
        .collect()
}

pub fn expiration_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_VALIDITY_MINUTES)
}

/// True only when a pending code exists, matches, and has not expired.
/// `stored`/`expiry` being `None` means the code was never issued or already
/// consumed; both cases fail regardless of the submitted digits.
pub fn otp_is_valid(
    stored: Option<&str>,
    expiry: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> bool {
    match (stored, expiry) {
        (Some(code), Some(expiry)) => code == submitted && now <= expiry,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_otp_is_six_digits() {
        let otp = generate_otp();
        assert_eq!(otp.len(), OTP_LENGTH);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_valid_code_within_window() {
        let now = Utc::now();
        assert!(otp_is_valid(
            Some("123456"),
            Some(expiration_from(now)),
            "123456",
            now
        ));
    }

    #[test]
    fn test_wrong_code_rejected() {
        let now = Utc::now();
        assert!(!otp_is_valid(
            Some("123456"),
            Some(expiration_from(now)),
            "654321",
            now
        ));
    }

    #[test]
    fn test_expired_code_rejected_even_when_correct() {
        let issued = Utc::now();
        let late = issued + Duration::minutes(OTP_VALIDITY_MINUTES + 1);
        assert!(!otp_is_valid(
            Some("123456"),
            Some(expiration_from(issued)),
            "123456",
            late
        ));
    }

    #[test]
    fn test_consumed_code_rejected_even_when_correct() {
        // Cleared fields model a consumed code.
        let now = Utc::now();
        assert!(!otp_is_valid(None, None, "123456", now));
        assert!(!otp_is_valid(Some("123456"), None, "123456", now));
    }
}
