//! Login form payload.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginRequestError {
    #[error("enter a valid email address")]
    InvalidEmail,

    #[error("enter your password")]
    MissingPassword,
}

impl LoginRequest {
    /// Trims the email and checks both fields before anything is sent.
    pub fn new(email: &str, password: &str) -> Result<Self, LoginRequestError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(LoginRequestError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(LoginRequestError::MissingPassword);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}
