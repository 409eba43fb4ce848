//! Stored-credential handling for the configured scheme.

use tracing::warn;

use ptqa_core::config::session::CredentialScheme;
use ptqa_core::result::AppResult;

use super::hasher::PasswordHasher;

/// Turns passwords into their stored form and checks them against it.
///
/// With [`CredentialScheme::Plaintext`] the stored value is the password
/// itself and lookups compare it remotely. With [`CredentialScheme::Argon2`]
/// the stored value is a PHC hash verified locally.
#[derive(Debug, Clone)]
pub struct CredentialHandler {
    scheme: CredentialScheme,
    hasher: PasswordHasher,
}

impl CredentialHandler {
    /// Create a handler for `scheme`.
    pub fn new(scheme: CredentialScheme) -> Self {
        Self {
            scheme,
            hasher: PasswordHasher::new(),
        }
    }

    /// The configured scheme.
    pub fn scheme(&self) -> CredentialScheme {
        self.scheme
    }

    /// The value to write into the `password` column.
    pub fn to_stored(&self, password: &str) -> AppResult<String> {
        match self.scheme {
            CredentialScheme::Plaintext => Ok(password.to_string()),
            CredentialScheme::Argon2 => self.hasher.hash_password(password),
        }
    }

    /// Check `password` against a stored value.
    pub fn matches(&self, password: &str, stored: &str) -> AppResult<bool> {
        match self.scheme {
            CredentialScheme::Plaintext => Ok(password == stored),
            CredentialScheme::Argon2 => {
                if !PasswordHasher::is_hash(stored) {
                    warn!("Stored credential is not hashed; rejecting");
                    return Ok(false);
                }
                self.hasher.verify_password(password, stored)
            }
        }
    }
}
