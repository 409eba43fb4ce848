//! Credential hashing, comparison and password policy.

pub mod credential;
pub mod hasher;
pub mod validator;

pub use credential::CredentialHandler;
pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
