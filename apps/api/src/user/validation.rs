use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::otp::OTP_LENGTH;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::validation::{
    check_birth_date, check_email, check_mobile, check_name, check_password,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    #[serde(default)]
    pub recovery_email: Option<String>,
    pub date_of_birth: String,
    pub mobile_number: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl SignupRequest {
    /// Returns the parsed birth date so the handler stores what was checked.
    pub fn validate(&self) -> Result<NaiveDate, AppError> {
        check_name("firstName", &self.first_name)?;
        check_name("lastName", &self.last_name)?;
        check_email("email", &self.email)?;
        check_password("password", &self.password)?;
        if self.password != self.re_password {
            return Err(AppError::Validation(
                "rePassword does not match password".to_string(),
            ));
        }
        if let Some(recovery) = &self.recovery_email {
            check_email("recoveryEmail", recovery)?;
        }
        check_mobile("mobileNumber", &self.mobile_number)?;
        check_birth_date("dateOfBirth", &self.date_of_birth)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    /// Email, recovery email, or mobile number.
    pub login_data: String,
    pub password: String,
}

impl SigninRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.login_data.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "loginData and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_email("email", &self.email)?;
        check_password("newPassword", &self.new_password)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

impl ResetRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_email("email", &self.email)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

impl VerifyOtpRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_email("email", &self.email)?;
        if self.otp.len() != OTP_LENGTH || !self.otp.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "otp must be a 6-digit code".to_string(),
            ));
        }
        check_password("newPassword", &self.new_password)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub recovery_email: Option<String>,
    pub mobile_number: Option<String>,
    pub date_of_birth: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<Option<NaiveDate>, AppError> {
        if let Some(first) = &self.first_name {
            check_name("firstName", first)?;
        }
        if let Some(last) = &self.last_name {
            check_name("lastName", last)?;
        }
        if let Some(email) = &self.email {
            check_email("email", email)?;
        }
        if let Some(recovery) = &self.recovery_email {
            check_email("recoveryEmail", recovery)?;
        }
        if let Some(mobile) = &self.mobile_number {
            check_mobile("mobileNumber", mobile)?;
        }
        match &self.date_of_birth {
            Some(raw) => check_birth_date("dateOfBirth", raw).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryEmailQuery {
    pub recovery_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request() -> SignupRequest {
        SignupRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "Abcdefgh1".to_string(),
            re_password: "Abcdefgh1".to_string(),
            recovery_email: None,
            date_of_birth: "1990-04-02".to_string(),
            mobile_number: "01012345678".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_signup_accepts_valid_request() {
        assert!(signup_request().validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_password_mismatch() {
        let mut req = signup_request();
        req.re_password = "Different1x".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_rejects_bad_mobile() {
        let mut req = signup_request();
        req.mobile_number = "12345".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_otp_rejects_short_code() {
        let req = VerifyOtpRequest {
            email: "jane@example.com".to_string(),
            otp: "123".to_string(),
            new_password: "Abcdefgh1".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_allows_partial_body() {
        let req = UpdateUserRequest {
            recovery_email: Some("backup@example.com".to_string()),
            ..Default::default()
        };
        assert!(req.validate().unwrap().is_none());
    }
}
