//! Shared validation utilities
//!
//! Common validation functions for input data across commands.

use thiserror::Error;

/// Errors that can occur during slug validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlugValidationError {
    #[error("Slug is required and cannot be empty")]
    Required,

    #[error("Slug must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },

    #[error("Slug can only contain lowercase letters, numbers, and hyphens")]
    InvalidFormat,

    #[error("Slug cannot start or end with a hyphen")]
    InvalidHyphenPlacement,
}

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be between 1 and {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },
}

/// Errors that can occur during email validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("{field} is not a valid email address")]
    InvalidFormat { field: &'static str },
}

/// Validate a slug (URL-safe identifier)
///
/// # Rules
/// - Must not be empty
/// - Must not exceed max_length characters
/// - Must contain only lowercase letters, numbers, and hyphens
/// - Must not start or end with a hyphen
pub fn validate_slug(slug: &str, max_length: usize) -> Result<(), SlugValidationError> {
    if slug.is_empty() {
        return Err(SlugValidationError::Required);
    }

    if slug.len() > max_length {
        return Err(SlugValidationError::TooLong { max_length });
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SlugValidationError::InvalidFormat);
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(SlugValidationError::InvalidHyphenPlacement);
    }

    Ok(())
}

/// Validate a required text field
///
/// Must not be empty after trimming and must not exceed max_length
/// characters.
pub fn validate_name(
    name: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required { field });
    }

    if name.len() > max_length {
        return Err(NameValidationError::TooLong { field, max_length });
    }

    Ok(())
}

/// Validate an email address field
///
/// Intentionally shallow: one `@` with non-empty local part and a domain
/// containing a dot. Deliverability is the mail system's problem.
pub fn validate_email(email: &str, field: &'static str) -> Result<(), EmailValidationError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.starts_with('.') {
        return Err(EmailValidationError::InvalidFormat { field });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        for slug in ["acme", "acme-corp", "acme-corp-123", "a", "123", "my-org-2024"] {
            assert!(validate_slug(slug, 100).is_ok(), "slug '{}' should be valid", slug);
        }
    }

    #[test]
    fn test_invalid_slugs() {
        assert_eq!(validate_slug("", 100), Err(SlugValidationError::Required));
        assert!(matches!(
            validate_slug(&"a".repeat(101), 100),
            Err(SlugValidationError::TooLong { .. })
        ));
        for slug in ["UPPERCASE", "has spaces", "has_underscore", "has@special"] {
            assert_eq!(
                validate_slug(slug, 100),
                Err(SlugValidationError::InvalidFormat),
                "slug '{}' should be rejected",
                slug
            );
        }
        for slug in ["-leading", "trailing-"] {
            assert_eq!(
                validate_slug(slug, 100),
                Err(SlugValidationError::InvalidHyphenPlacement)
            );
        }
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_name("Website relaunch", "name", 255).is_ok());
        assert!(matches!(
            validate_name("   ", "name", 255),
            Err(NameValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_name(&"x".repeat(300), "name", 255),
            Err(NameValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("billing@acme.com", "client_email").is_ok());
        for email in ["not-an-email", "@acme.com", "user@", "user@nodot", "user@.com"] {
            assert!(
                validate_email(email, "client_email").is_err(),
                "email '{}' should be rejected",
                email
            );
        }
    }
}
