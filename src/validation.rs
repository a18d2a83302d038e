//! Login and signup form validation.
//!
//! Rules:
//! - Email: alphanumeric local part with single `.`, `+`, `_` or `-` separators,
//!   `@`, alphanumeric host labels separated by `.` or `-`, and an alphabetic
//!   TLD of at least 2 letters, so the shortest host is `b.co`.
//! - Password: at least 4 characters; signup additionally requires a digit or
//!   one of `!@#$%^&*`.
//! - Name (signup only): at least 2 characters, letters and whitespace only.
//!
//! Lengths are counted in UTF-16 code units, the unit browser form fields use,
//! so `😀😀` is a 4-character password.
//!
//! All validators expect already-trimmed input.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;

const MIN_PASSWORD_LEN: usize = 4;
const MIN_NAME_LEN: usize = 2;
const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+([.+_-][a-zA-Z0-9]+)*@[a-zA-Z0-9]+([.-][a-zA-Z0-9]+)*\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern is valid"));

/// Fail with `EmptyField` if any of the given fields is empty
pub fn require_filled(fields: &[&str]) -> Result<(), ValidationError> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ValidationError::EmptyField);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if form_len(password) < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Signup-only: the password must contain a digit or a symbol
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password
        .chars()
        .any(|c| c.is_ascii_digit() || PASSWORD_SYMBOLS.contains(&c));
    if !strong {
        return Err(ValidationError::PasswordTooWeak);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if form_len(name) < MIN_NAME_LEN || !NAME_PATTERN.is_match(name) {
        return Err(ValidationError::InvalidNameFormat);
    }
    Ok(())
}

fn form_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Local part of an address (`ann` for `ann@example.com`)
pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "ann@example.com",
            "bob@ex.com",
            "first.last@mail-server.org",
            "user_name@sub.domain.co",
            "tag+filter@gmail.com",
            "a1@abc.io",
        ] {
            assert_eq!(validate_email(email), Ok(()), "{email} should be valid");
        }
    }

    #[test]
    fn test_email_shortest_host() {
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(
            validate_email("a@.co"),
            Err(ValidationError::InvalidEmailFormat)
        );
    }

    #[test]
    fn test_email_missing_at() {
        assert_eq!(
            validate_email("annexample.com"),
            Err(ValidationError::InvalidEmailFormat)
        );
    }

    #[test]
    fn test_email_missing_dot_before_tld() {
        assert_eq!(
            validate_email("ann@examplecom"),
            Err(ValidationError::InvalidEmailFormat)
        );
    }

    #[test]
    fn test_email_short_or_numeric_tld() {
        assert_eq!(
            validate_email("ann@example.c"),
            Err(ValidationError::InvalidEmailFormat)
        );
        assert_eq!(
            validate_email("ann@example.c0m"),
            Err(ValidationError::InvalidEmailFormat)
        );
    }

    #[test]
    fn test_email_bad_local_part() {
        // Separators must sit between alphanumerics
        for email in [".ann@example.com", "ann.@example.com", "an..n@example.com"] {
            assert_eq!(
                validate_email(email),
                Err(ValidationError::InvalidEmailFormat),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_rejects_surrounding_whitespace() {
        assert_eq!(
            validate_email(" ann@example.com"),
            Err(ValidationError::InvalidEmailFormat)
        );
    }

    #[test]
    fn test_password_length() {
        assert_eq!(validate_password("abc"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("abcd"), Ok(()));
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // Each emoji is a surrogate pair
        assert_eq!(validate_password("😀😀"), Ok(()));
        assert_eq!(validate_password("😀"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("äöü"), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(
            validate_password_strength("abcdef"),
            Err(ValidationError::PasswordTooWeak)
        );
        assert_eq!(validate_password_strength("abcde1"), Ok(()));
        assert_eq!(validate_password_strength("abcde!"), Ok(()));
        assert_eq!(validate_password_strength("ab^cde"), Ok(()));
        // Symbols outside the accepted set don't count
        assert_eq!(
            validate_password_strength("abc-de"),
            Err(ValidationError::PasswordTooWeak)
        );
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("Ann Lee"), Ok(()));
        assert_eq!(validate_name("A"), Err(ValidationError::InvalidNameFormat));
        assert_eq!(validate_name("R2D2"), Err(ValidationError::InvalidNameFormat));
        assert_eq!(
            validate_name("Ann-Lee"),
            Err(ValidationError::InvalidNameFormat)
        );
    }

    #[test]
    fn test_require_filled() {
        assert_eq!(require_filled(&["a", "b"]), Ok(()));
        assert_eq!(require_filled(&["a", ""]), Err(ValidationError::EmptyField));
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("ann@example.com"), "ann");
        assert_eq!(local_part("no-at-sign"), "no-at-sign");
    }
}
