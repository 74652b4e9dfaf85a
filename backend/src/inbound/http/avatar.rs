//! Gravatar URLs for comment authors.

use sha2::{Digest, Sha256};

use crate::domain::EmailAddress;

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar/";
const SIZE: u16 = 100;
const RATING: &str = "g";
const FALLBACK: &str = "retro";

/// Avatar URL keyed on the SHA-256 of the trimmed, lower-cased address.
///
/// # Examples
/// ```
/// use blog::domain::EmailAddress;
/// use blog::inbound::http::avatar::gravatar_url;
///
/// let email = EmailAddress::new("ada@example.com").expect("valid email");
/// assert!(gravatar_url(&email).ends_with("?s=100&r=g&d=retro"));
/// ```
pub fn gravatar_url(email: &EmailAddress) -> String {
    let normalised = email.as_ref().trim().to_lowercase();
    let digest = hex::encode(Sha256::digest(normalised.as_bytes()));
    format!("{GRAVATAR_BASE}{digest}?s={SIZE}&r={RATING}&d={FALLBACK}")
}
