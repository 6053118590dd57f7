//! Result type alias
//!
//! Convenience alias using [`HarvestError`] as the error type; use it for
//! all fallible operations in the crate.

use super::errors::HarvestError;

/// Result type alias for geoharvest operations.
///
/// # Examples
///
/// ```
/// use geoharvest::domain::result::Result;
/// use geoharvest::domain::errors::HarvestError;
///
/// fn parse_code(raw: &str) -> Result<i64> {
///     raw.parse()
///         .map_err(|_| HarvestError::Transform(format!("not a code: {raw}")))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HarvestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::HarvestError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(HarvestError::Cancelled);
        assert!(result.is_err());
    }
}
