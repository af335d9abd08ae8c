//! Credential policies checked locally before any network call.

use regex::Regex;
use thiserror::Error;

/// Why a credential was rejected. One variant per policy rule.
#[derive(Debug, Error, PartialEq)]
pub enum CredentialError {
    #[error("Username is required")]
    UserNameRequired,
    #[error("Username must be at least 4 characters")]
    UserNameTooShort,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Minimum 6 characters required")]
    PasswordTooShort,
    #[error("Password must include at least 1 number")]
    PasswordNeedsDigit,
    #[error("Password must include at least 1 special character")]
    PasswordNeedsSpecial,
}

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn validate_user_name(user_name: &str) -> Result<(), CredentialError> {
    if user_name.is_empty() {
        return Err(CredentialError::UserNameRequired);
    }
    if user_name.chars().count() < 4 {
        return Err(CredentialError::UserNameTooShort);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CredentialError> {
    if email.is_empty() {
        return Err(CredentialError::EmailRequired);
    }
    let pattern = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
    if !pattern.is_match(email) {
        return Err(CredentialError::EmailInvalid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::PasswordRequired);
    }
    if password.chars().count() < 6 {
        return Err(CredentialError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CredentialError::PasswordNeedsDigit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(CredentialError::PasswordNeedsSpecial);
    }
    Ok(())
}
