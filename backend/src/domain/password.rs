//! Password hashing and verification.
//!
//! Credentials are stored as PHC strings (`$argon2id$v=19$...`) so that the
//! algorithm, parameters and salt travel with the hash. Plaintext passwords are
//! held in [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};
use zeroize::Zeroizing;

const SALT_LEN: usize = 16;

/// Raised when a submitted password fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("password must not be empty")]
    Empty,
}

/// Plaintext password as submitted by a user.
///
/// Leading and trailing whitespace is preserved; only an empty value is
/// rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Self-describing salted password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential(String);

impl PasswordCredential {
    /// Wrap a PHC string loaded from storage. The value is not parsed until
    /// verification; a malformed string simply never verifies.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    #[must_use]
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordCredential(<redacted>)")
    }
}

/// Failure to produce a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("failed to gather salt entropy: {message}")]
    Entropy { message: String },
    #[error("failed to hash password: {message}")]
    Hash { message: String },
}

/// Hashes new passwords and checks submitted ones against stored credentials.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialManager: Send + Sync {
    /// Produce a fresh salted credential for `password`.
    fn hash(&self, password: &Password) -> Result<PasswordCredential, PasswordHashError>;

    /// Constant-time check of `password` against `credential`.
    ///
    /// Mismatches and malformed credentials both return `false`.
    fn verify(&self, password: &Password, credential: &PasswordCredential) -> bool;
}

/// Argon2id credential manager.
///
/// # Examples
/// ```
/// use blog::domain::{Argon2Credentials, CredentialManager, Password};
///
/// let manager = Argon2Credentials::default();
/// let password = Password::new("hunter2").expect("non-empty");
/// let credential = manager.hash(&password).expect("hashing succeeds");
/// assert!(credential.as_phc().starts_with("$argon2id$"));
/// assert!(manager.verify(&password, &credential));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Argon2Credentials {
    params: Option<Params>,
}

impl Argon2Credentials {
    /// Use explicit cost parameters instead of the library defaults.
    ///
    /// Verification always honours the parameters encoded in the stored
    /// credential, so changing them never invalidates existing accounts.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            params: Some(params),
        }
    }

    fn hasher(&self) -> Argon2<'static> {
        match &self.params {
            Some(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            None => Argon2::default(),
        }
    }
}

impl CredentialManager for Argon2Credentials {
    fn hash(&self, password: &Password) -> Result<PasswordCredential, PasswordHashError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        getrandom::getrandom(&mut salt_bytes).map_err(|err| PasswordHashError::Entropy {
            message: err.to_string(),
        })?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })?;
        let phc = self
            .hasher()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })?;
        Ok(PasswordCredential(phc.to_string()))
    }

    fn verify(&self, password: &Password, credential: &PasswordCredential) -> bool {
        let Ok(parsed) = PasswordHash::new(credential.as_phc()) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn manager() -> Argon2Credentials {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("minimal params");
        Argon2Credentials::with_params(params)
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("non-empty password")
    }

    #[rstest]
    fn empty_passwords_are_rejected() {
        assert_eq!(Password::new(""), Err(PasswordValidationError::Empty));
    }

    #[rstest]
    fn whitespace_is_preserved() {
        assert_eq!(password("  pw ").expose(), "  pw ");
    }

    #[rstest]
    fn debug_output_hides_secrets(manager: Argon2Credentials) {
        let pw = password("s3cret");
        let credential = manager.hash(&pw).expect("hash");
        assert!(!format!("{pw:?}").contains("s3cret"));
        assert!(!format!("{credential:?}").contains(credential.as_phc()));
    }

    #[rstest]
    fn hash_is_self_describing_argon2id(manager: Argon2Credentials) {
        let credential = manager.hash(&password("pw")).expect("hash");
        assert!(credential.as_phc().starts_with("$argon2id$v=19$"));
    }

    #[rstest]
    fn salts_differ_between_hashes(manager: Argon2Credentials) {
        let pw = password("same");
        let first = manager.hash(&pw).expect("hash");
        let second = manager.hash(&pw).expect("hash");
        assert_ne!(first, second);
        assert!(manager.verify(&pw, &first));
        assert!(manager.verify(&pw, &second));
    }

    #[rstest]
    #[case("correct", "correct", true)]
    #[case("correct", "Correct", false)]
    #[case("correct", "correct ", false)]
    fn verify_matches_only_the_original(
        manager: Argon2Credentials,
        #[case] stored: &str,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let credential = manager.hash(&password(stored)).expect("hash");
        assert_eq!(manager.verify(&password(attempt), &credential), expected);
    }

    #[rstest]
    #[case("")]
    #[case("plaintext")]
    #[case("$argon2id$v=19$broken")]
    fn malformed_credentials_never_verify(manager: Argon2Credentials, #[case] phc: &str) {
        let credential = PasswordCredential::from_phc(phc);
        assert!(!manager.verify(&password("pw"), &credential));
    }
}
