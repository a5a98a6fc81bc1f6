//! The validated result-count limit.
//!
//! The `limit` query parameter caps how many face predictions a response may
//! carry. Zero and absence both mean "no limit"; that overload is part of
//! the wire contract and is preserved here rather than reinterpreted.

use crate::error::LimitError;

/// A validated, non-negative result-count limit.
///
/// The inner value is `0` for "unlimited"; any positive value is an upper
/// bound on the number of predictions returned. Construction goes through
/// [`Limit::parse`], so a `Limit` in hand is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u32);

impl Limit {
    /// No cap on the number of predictions.
    pub const UNLIMITED: Limit = Limit(0);

    /// Parse the raw `limit` query parameter.
    ///
    /// # Arguments
    /// * `raw` - The parameter as received: `None` when absent, otherwise
    ///   the raw string value
    ///
    /// # Returns
    /// * `Ok(Limit)` - absent or `"0"` map to [`Limit::UNLIMITED`], positive
    ///   integers to themselves
    /// * `Err(LimitError::InvalidFormat)` - not an integer
    /// * `Err(LimitError::InvalidValue)` - an integer, but negative (or too
    ///   large to be a meaningful cap)
    pub fn parse(raw: Option<&str>) -> Result<Limit, LimitError> {
        let Some(raw) = raw else {
            return Ok(Limit::UNLIMITED);
        };

        let value: i64 = raw.trim().parse().map_err(|_| LimitError::InvalidFormat)?;
        if value < 0 {
            return Err(LimitError::InvalidValue);
        }
        let value = u32::try_from(value).map_err(|_| LimitError::InvalidValue)?;
        Ok(Limit(value))
    }

    /// Build a limit from an already-validated count. `0` means unlimited.
    pub fn from_count(count: u32) -> Limit {
        Limit(count)
    }

    /// The raw cap: `0` when unlimited.
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_unlimited(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unlimited() {
            write!(f, "unlimited")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_limit_is_unlimited() {
        assert_eq!(Limit::parse(None), Ok(Limit::UNLIMITED));
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let limit = Limit::parse(Some("0")).unwrap();
        assert!(limit.is_unlimited());
        assert_eq!(limit.get(), 0);
    }

    #[test]
    fn test_positive_limit_is_kept_exactly() {
        assert_eq!(Limit::parse(Some("1")).unwrap().get(), 1);
        assert_eq!(Limit::parse(Some("42")).unwrap().get(), 42);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        assert_eq!(Limit::parse(Some(" 5 ")).unwrap().get(), 5);
    }

    #[test]
    fn test_negative_limit_is_an_invalid_value() {
        assert_eq!(Limit::parse(Some("-1")), Err(LimitError::InvalidValue));
        assert_eq!(Limit::parse(Some("-999")), Err(LimitError::InvalidValue));
    }

    #[test]
    fn test_non_numeric_limit_is_an_invalid_format() {
        assert_eq!(Limit::parse(Some("hello")), Err(LimitError::InvalidFormat));
        assert_eq!(Limit::parse(Some("1.5")), Err(LimitError::InvalidFormat));
        assert_eq!(Limit::parse(Some("")), Err(LimitError::InvalidFormat));
    }

    #[test]
    fn test_error_messages_match_the_wire_contract() {
        assert_eq!(
            LimitError::InvalidValue.to_string(),
            "Limit value is invalid"
        );
        assert_eq!(
            LimitError::InvalidFormat.to_string(),
            "Limit format is invalid"
        );
    }

    #[test]
    fn test_absurdly_large_limit_is_an_invalid_value() {
        assert_eq!(
            Limit::parse(Some("4294967296")),
            Err(LimitError::InvalidValue)
        );
    }
}
