//! Human-readable order codes.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OrderCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderCodeError {
    /// The input does not start with the `ORD-` prefix.
    #[error("order code must start with '{}'", OrderCode::PREFIX)]
    MissingPrefix,
    /// The suffix is not exactly five digits.
    #[error("order code must end in exactly {} digits", OrderCode::DIGITS)]
    BadSuffix,
}

/// The customer-facing order identifier, e.g. `ORD-48213`.
///
/// This is the code printed on confirmation emails and quoted in support
/// requests; it is distinct from the database row ID. Codes are drawn from a
/// five-digit space, so collisions are expected at modest order volumes -
/// the insert path must enforce uniqueness and regenerate on conflict.
///
/// ## Examples
///
/// ```
/// use furnspace_core::OrderCode;
///
/// let code = OrderCode::generate(&mut rand::rng());
/// assert!(code.as_str().starts_with("ORD-"));
/// assert_eq!(code, OrderCode::parse(code.as_str()).unwrap());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Prefix shared by every order code.
    pub const PREFIX: &'static str = "ORD-";

    /// Number of digits following the prefix.
    pub const DIGITS: usize = 5;

    /// Generate a random order code.
    ///
    /// The suffix is uniform over `10000..=99999`, giving 90 000 possible
    /// codes. Uniqueness is NOT guaranteed here; callers persist the code
    /// under a unique constraint and retry on conflict.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: u32 = rng.random_range(10_000..=99_999);
        Self(format!("{}{suffix}", Self::PREFIX))
    }

    /// Parse an `OrderCode` from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing or the suffix is not
    /// exactly five digits.
    pub fn parse(s: &str) -> Result<Self, OrderCodeError> {
        let suffix = s
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderCodeError::MissingPrefix)?;

        if suffix.len() != Self::DIGITS || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderCodeError::BadSuffix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the order code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let code = OrderCode::generate(&mut rng);
            assert!(code.as_str().starts_with("ORD-"));
            assert_eq!(code.as_str().len(), 9);
            assert!(OrderCode::parse(code.as_str()).is_ok());
        }
    }

    #[test]
    fn test_generate_suffix_in_range() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let code = OrderCode::generate(&mut rng);
            let suffix: u32 = code.as_str()[OrderCode::PREFIX.len()..].parse().unwrap();
            assert!((10_000..=99_999).contains(&suffix));
        }
    }

    #[test]
    fn test_parse_valid() {
        let code = OrderCode::parse("ORD-12345").unwrap();
        assert_eq!(code.as_str(), "ORD-12345");
        assert_eq!(code.to_string(), "ORD-12345");
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert_eq!(OrderCode::parse("12345"), Err(OrderCodeError::MissingPrefix));
        assert_eq!(
            OrderCode::parse("ord-12345"),
            Err(OrderCodeError::MissingPrefix)
        );
    }

    #[test]
    fn test_parse_bad_suffix() {
        assert_eq!(OrderCode::parse("ORD-123"), Err(OrderCodeError::BadSuffix));
        assert_eq!(
            OrderCode::parse("ORD-123456"),
            Err(OrderCodeError::BadSuffix)
        );
        assert_eq!(OrderCode::parse("ORD-12a45"), Err(OrderCodeError::BadSuffix));
    }
}
