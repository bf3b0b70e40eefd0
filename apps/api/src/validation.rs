//! Field-level validation rules shared by the per-endpoint request validators.
//! Rules mirror the deployed schema: uppercase-first alphanumeric passwords,
//! Egyptian mobile numbers, 2-20 character name parts.

use crate::errors::AppError;

pub fn check_name(field: &str, value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if (2..=20).contains(&len) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between 2 and 20 characters"
        )))
    }
}

pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )))
    }
}

/// Minimal structural check: one `@` with a dot somewhere after it.
pub fn check_email(field: &str, value: &str) -> Result<(), AppError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field} is not a valid email")))
    }
}

/// Password rule: `^[A-Z][A-Za-z0-9]{8,40}$`.
pub fn check_password(field: &str, value: &str) -> Result<(), AppError> {
    let mut chars = value.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let rest: Vec<char> = chars.collect();
    let rest_ok = (8..=40).contains(&rest.len()) && rest.iter().all(|c| c.is_ascii_alphanumeric());
    if first_ok && rest_ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must start with an uppercase letter followed by 8-40 letters or digits"
        )))
    }
}

/// Mobile rule: `^(\+20|0)1[0-9]{9}$`.
pub fn check_mobile(field: &str, value: &str) -> Result<(), AppError> {
    let digits = value
        .strip_prefix("+20")
        .or_else(|| value.strip_prefix('0'));
    let valid = digits
        .is_some_and(|d| d.len() == 10 && d.starts_with('1') && d.chars().all(|c| c.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} is not a valid mobile number"
        )))
    }
}

/// ISO `YYYY-MM-DD`, strictly in the past.
pub fn check_birth_date(field: &str, value: &str) -> Result<chrono::NaiveDate, AppError> {
    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} must be formatted as YYYY-MM-DD")))?;
    if date < chrono::Utc::now().date_naive() {
        Ok(date)
    } else {
        Err(AppError::Validation(format!("{field} must be in the past")))
    }
}

pub fn check_object_id(field: &str, value: &str) -> Result<mongodb::bson::oid::ObjectId, AppError> {
    mongodb::bson::oid::ObjectId::parse_str(value)
        .map_err(|_| AppError::Validation(format!("{field} is not a valid id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rule() {
        assert!(check_password("password", "Abcdefgh1").is_ok());
        assert!(check_password("password", "abcdefgh1").is_err()); // no leading uppercase
        assert!(check_password("password", "Abcdefg").is_err()); // too short
        assert!(check_password("password", "Abcdefgh!").is_err()); // symbol
    }

    #[test]
    fn test_mobile_rule() {
        assert!(check_mobile("mobileNumber", "01012345678").is_ok());
        assert!(check_mobile("mobileNumber", "+201012345678").is_ok());
        assert!(check_mobile("mobileNumber", "01234567").is_err()); // too short
        assert!(check_mobile("mobileNumber", "02012345678").is_err()); // not 01x
        assert!(check_mobile("mobileNumber", "0101234567a").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(check_email("email", "a@b.com").is_ok());
        assert!(check_email("email", "a.b@sub.domain.org").is_ok());
        assert!(check_email("email", "nodomain@").is_err());
        assert!(check_email("email", "missing-at.com").is_err());
        assert!(check_email("email", "x@nodot").is_err());
    }

    #[test]
    fn test_birth_date_must_be_past() {
        assert!(check_birth_date("dateOfBirth", "1990-04-02").is_ok());
        assert!(check_birth_date("dateOfBirth", "2999-01-01").is_err());
        assert!(check_birth_date("dateOfBirth", "1990-13-01").is_err());
    }

    #[test]
    fn test_name_bounds() {
        assert!(check_name("firstName", "Al").is_ok());
        assert!(check_name("firstName", "A").is_err());
        assert!(check_name("firstName", &"x".repeat(21)).is_err());
    }
}
