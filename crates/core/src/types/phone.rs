//! Phone number type with the reminder dispatcher's normalization policy.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when normalizing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty after stripping formatting characters.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number has no `+`-prefixed country code after normalization.
    #[error("phone number is missing a country code: {0}")]
    MissingCountryCode(String),
}

/// A dialable phone number with a `+`-prefixed country code.
///
/// Normalization is a heuristic, not general E.164 validation: a single
/// leading `0` (local trunk prefix) is rewritten to the given country
/// calling code, and anything that still lacks a leading `+` is rejected.
///
/// ## Examples
///
/// ```
/// use brightclass_core::Phone;
///
/// let p = Phone::normalize("08012345678", "+234").unwrap();
/// assert_eq!(p.as_str(), "+2348012345678");
///
/// let p = Phone::normalize("+15551234567", "+234").unwrap();
/// assert_eq!(p.as_str(), "+15551234567");
///
/// assert!(Phone::normalize("5551234567", "+234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Normalize a raw phone number against a country calling code.
    ///
    /// Spaces, dashes and parentheses are stripped before the trunk-prefix
    /// rewrite. A double leading zero is not treated as a trunk prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::MissingCountryCode`] when the normalized number does
    /// not start with `+`.
    pub fn normalize(raw: &str, country_code: &str) -> Result<Self, PhoneError> {
        let digits: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        let candidate = match digits.strip_prefix('0') {
            Some(rest) if !rest.starts_with('0') => format!("{country_code}{rest}"),
            _ => digits,
        };

        if !candidate.starts_with('+') {
            return Err(PhoneError::MissingCountryCode(candidate));
        }

        Ok(Self(candidate))
    }

    /// Returns the normalized number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_local_trunk_prefix_rewritten() {
        let p = Phone::normalize("08012345678", "+234").unwrap();
        assert_eq!(p.as_str(), "+2348012345678");
    }

    #[test]
    fn test_international_number_unchanged() {
        let p = Phone::normalize("+15551234567", "+234").unwrap();
        assert_eq!(p.as_str(), "+15551234567");
    }

    #[test]
    fn test_bare_number_rejected() {
        let err = Phone::normalize("5551234567", "+234").unwrap_err();
        assert!(matches!(err, PhoneError::MissingCountryCode(_)));
    }

    #[test]
    fn test_double_zero_not_a_trunk_prefix() {
        assert!(matches!(
            Phone::normalize("008012345678", "+234"),
            Err(PhoneError::MissingCountryCode(_))
        ));
    }

    #[test]
    fn test_formatting_characters_stripped() {
        let p = Phone::normalize("0801 234-5678", "+234").unwrap();
        assert_eq!(p.as_str(), "+2348012345678");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Phone::normalize("  ", "+234"), Err(PhoneError::Empty)));
    }
}
