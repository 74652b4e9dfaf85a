//! Authentication inputs: login credentials and registrations.
//!
//! Handlers validate raw form values field by field; these types only exist
//! once every field is valid, so services never see malformed input.

use std::fmt;

use super::password::{Password, PasswordValidationError};
use super::user::{DisplayName, EmailAddress, UserValidationError};

/// First invalid field encountered by [`LoginCredentials::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    Email(UserValidationError),
    Password(PasswordValidationError),
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::Password(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use blog::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "pw").expect("valid");
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password().expose(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }

    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(LoginValidationError::Email)?;
        let password = Password::new(password).map_err(LoginValidationError::Password)?;
        Ok(Self::new(email, password))
    }

    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: DisplayName,
    pub credentials: LoginCredentials,
}

impl Registration {
    #[must_use]
    pub fn new(name: DisplayName, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            credentials: LoginCredentials::new(email, password),
        }
    }
}
