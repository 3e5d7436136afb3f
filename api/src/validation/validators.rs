//! Field validators for input validation
//!
//! Reusable checks applied by the route schemas. Each returns the violated
//! `Constraint` so the caller can attach the field path.

use lazy_static::lazy_static;
use regex::Regex;

use super::extractors::Constraint;

/// Longest accepted local part (before the `@`)
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;
/// Longest accepted address overall
const MAX_EMAIL_LENGTH: usize = 254;

lazy_static! {
    /// Local part: dot-atom characters, plus internationalized letters and digits
    static ref EMAIL_LOCAL_REGEX: Regex = Regex::new(
        r"^[\p{L}\p{M}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{M}\p{N}!#$%&'*+/=?^_`{|}~-]+)*$"
    ).unwrap();

    /// Domain: at least two dot-separated labels (IDN labels allowed), alphabetic TLD
    static ref EMAIL_DOMAIN_REGEX: Regex = Regex::new(
        r"^(?:[\p{L}\p{M}\p{N}](?:[\p{L}\p{M}\p{N}-]{0,61}[\p{L}\p{M}\p{N}])?\.)+(?:\p{L}{2,63}|xn--[a-z0-9-]{1,59})$"
    ).unwrap();
}

/// Validate string length within bounds, counted in characters
pub fn validate_min_length(value: &str, min: usize) -> Result<(), Constraint> {
    if value.chars().count() < min {
        return Err(Constraint::MinLength { limit: min });
    }
    Ok(())
}

pub fn validate_max_length(value: &str, max: usize) -> Result<(), Constraint> {
    if value.chars().count() > max {
        return Err(Constraint::MaxLength { limit: max });
    }
    Ok(())
}

/// Validate that the whole value matches `pattern`
///
/// The pattern carries its own anchors, as declared on the field.
pub fn validate_pattern(value: &str, pattern: &Regex) -> Result<(), Constraint> {
    if !pattern.is_match(value) {
        return Err(Constraint::Pattern {
            pattern: pattern.as_str().to_string(),
        });
    }
    Ok(())
}

/// Validate a numeric value is strictly greater than `limit`
pub fn validate_greater_than(value: f64, limit: i64) -> Result<(), Constraint> {
    if value <= limit as f64 {
        return Err(Constraint::GreaterThan { limit });
    }
    Ok(())
}

/// Validate standard email address syntax (`local@domain.tld`)
pub fn validate_email(value: &str) -> Result<(), Constraint> {
    if value.chars().count() > MAX_EMAIL_LENGTH {
        return Err(Constraint::Email);
    }

    let Some((local, domain)) = value.rsplit_once('@') else {
        return Err(Constraint::Email);
    };

    if local.is_empty() || local.chars().count() > MAX_EMAIL_LOCAL_LENGTH {
        return Err(Constraint::Email);
    }

    if !EMAIL_LOCAL_REGEX.is_match(local) || !EMAIL_DOMAIN_REGEX.is_match(domain) {
        return Err(Constraint::Email);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_length_counts_chars() {
        assert!(validate_min_length("abc", 3).is_ok());
        assert_eq!(
            validate_min_length("ab", 3),
            Err(Constraint::MinLength { limit: 3 })
        );
        // 3 characters, 6 bytes
        assert!(validate_min_length("äöü", 3).is_ok());
        assert!(validate_max_length("äöü", 3).is_ok());
        assert_eq!(
            validate_max_length("abcd", 3),
            Err(Constraint::MaxLength { limit: 3 })
        );
    }

    #[test]
    fn test_validate_pattern() {
        let re = Regex::new("^[a-zA-Z0-9_]+$").unwrap();
        assert!(validate_pattern("valid_name1", &re).is_ok());
        assert_eq!(
            validate_pattern("bad!name", &re),
            Err(Constraint::Pattern {
                pattern: "^[a-zA-Z0-9_]+$".to_string()
            })
        );
    }

    #[test]
    fn test_validate_greater_than() {
        assert!(validate_greater_than(1.0, 0).is_ok());
        assert!(validate_greater_than(0.5, 0).is_ok());
        assert_eq!(
            validate_greater_than(0.0, 0),
            Err(Constraint::GreaterThan { limit: 0 })
        );
        assert!(validate_greater_than(-3.0, 0).is_err());
    }

    #[test]
    fn test_validate_email_accepts_common_addresses() {
        for email in [
            "ada@example.com",
            "first.last@sub.example.org",
            "user+tag@example.co.uk",
            "o'brien@example.ie",
            "josé@example.com",
            "a@bücher.de",
            "a@xn--bcher-kva.de",
            "用户@例子.广告",
        ] {
            assert!(validate_email(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        for email in [
            "not-an-email",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            "user.@example.com",
            ".user@example.com",
            "us..er@example.com",
            "user@-example.com",
            "user@example.c",
            "user name@example.com",
            "josé@bücher.d",
            "user@bücher-.de",
        ] {
            assert_eq!(validate_email(email), Err(Constraint::Email), "{email} should be invalid");
        }
    }

    #[test]
    fn test_validate_email_rejects_long_local_part() {
        let email = format!("{}@example.com", "a".repeat(65));
        assert!(validate_email(&email).is_err());
    }
}
