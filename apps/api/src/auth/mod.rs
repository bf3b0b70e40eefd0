pub mod claims;
pub mod extract;
pub mod otp;
pub mod password;
