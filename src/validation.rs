//! Value objects for user-supplied fields.
//!
//! Each constructor trims where the field allows it and fails fast with a
//! [`ValidationError`]; once built, the value is known to be well-formed.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]*$").expect("valid name regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$").expect("valid email regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("Invalid name entered")]
    InvalidName,

    #[error("Invalid email entered")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Password is too short!")]
    PasswordTooShort,

    #[error("{field} must be greater than {min}")]
    TooSmall { field: &'static str, min: i64 },
}

/// Trimmed, non-empty text.
pub fn non_empty(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = non_empty("email", raw)?;
        if !EMAIL_RE.is_match(&value) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = non_empty("fullname", raw)?;
        if !NAME_RE.is_match(&value) {
            return Err(ValidationError::InvalidName);
        }
        Ok(Self(value))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = non_empty("phone", raw)?;
        if !PHONE_RE.is_match(&value) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(Self(value))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A plaintext password that satisfies the length policy. Never persisted as is.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
