//! Password policy enforcement for new passwords.

use ptqa_core::config::session::SessionConfig;
use ptqa_core::error::AppError;

/// Validates new passwords before any I/O takes place.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the length policy.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }

    /// Validates a new password together with its confirmation.
    ///
    /// A mismatch is reported before the length policy.
    pub fn validate_with_confirmation(
        &self,
        password: &str,
        confirmation: &str,
    ) -> Result<(), AppError> {
        if password != confirmation {
            return Err(AppError::validation("Password confirmation does not match"));
        }
        self.validate(password)
    }
}

#[cfg(test)]
mod tests {
    use ptqa_core::error::ErrorKind;

    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&SessionConfig::default())
    }

    #[test]
    fn test_minimum_length() {
        assert!(validator().validate("abcd").is_ok());
        let err = validator().validate("abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_mismatch_reported_first() {
        let err = validator()
            .validate_with_confirmation("ab", "cd")
            .unwrap_err();
        assert!(err.message.contains("does not match"));
        assert!(validator().validate_with_confirmation("rahasia", "rahasia").is_ok());
    }
}
