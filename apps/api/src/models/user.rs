use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Role stored on the user document and carried in JWT claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    #[serde(rename = "Company_Hr")]
    CompanyHr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    /// Derived as `firstName + lastName`; re-derived whenever a name changes.
    pub username: String,
    pub email: String,
    /// Always a bcrypt hash, never plaintext.
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime>,
    pub date_of_birth: DateTime,
    pub mobile_number: String,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_otp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_otp_expiration: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// Username derivation rule applied on create and on name updates.
    pub fn derive_username(first_name: &str, last_name: &str) -> String {
        format!("{first_name}{last_name}")
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
        }
    }
}

/// Response shape for user data; never exposes the password hash or OTP state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_derivation_concatenates_names() {
        assert_eq!(User::derive_username("Jane", "Doe"), "JaneDoe");
    }

    #[test]
    fn test_role_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::CompanyHr).unwrap(),
            "\"Company_Hr\""
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"User\"");
    }
}
