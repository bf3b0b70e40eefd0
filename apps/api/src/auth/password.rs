use crate::errors::AppError;

/// Matches the cost the original deployment used; low enough for request-path
/// hashing, high enough to not be trivially brute-forceable.
const BCRYPT_COST: u32 = 8;

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(|e| AppError::Internal(anyhow::Error::new(e)))
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, AppError> {
    bcrypt::verify(plain, hashed).map_err(|e| AppError::Internal(anyhow::Error::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Secret123456").unwrap();
        assert_ne!(hash, "Secret123456");
        assert!(verify_password("Secret123456", &hash).unwrap());
        assert!(!verify_password("Wrong1234567", &hash).unwrap());
    }
}
