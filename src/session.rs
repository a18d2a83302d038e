use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation;

/// Display identity of the logged-in user
///
/// No credentials are kept: identity is local to this device and the password
/// is only checked for shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub email: String,
}

impl Session {
    /// Validate login input and build a session named after the email's local part
    pub fn from_login(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        let password = password.trim();

        validation::require_filled(&[email, password])?;
        validation::validate_email(email)?;
        validation::validate_password(password)?;

        Ok(Self {
            name: validation::local_part(email).to_string(),
            email: email.to_string(),
        })
    }

    /// Validate signup input and build a session with the supplied name
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// empty fields, name, email, password length, password strength.
    pub fn from_signup(name: &str, email: &str, password: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim();
        let password = password.trim();

        validation::require_filled(&[name, email, password])?;
        validation::validate_name(name)?;
        validation::validate_email(email)?;
        validation::validate_password(password)?;
        validation::validate_password_strength(password)?;

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Check a session read back from storage
    ///
    /// Stored sessions are only trusted if they could have been produced by
    /// login or signup: a non-blank name and a well-formed email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require_filled(&[self.name.trim(), self.email.trim()])?;
        validation::validate_email(&self.email)
    }
}
