//! Unified error types for the domain layer
//!
//! The rules operations themselves never fail: out-of-range values clamp and
//! unknown names fall back to defaults. Errors only surface where raw input is
//! converted into a constrained domain type (slot levels, ability keys,
//! archetype names).

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., a value outside its allowed range)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for values outside a constrained range.
    ///
    /// # Example
    /// ```ignore
    /// if !(1..=9).contains(&level) {
    ///     return Err(DomainError::validation(format!("Spell slot level out of range: {level}")));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("slot level must be 1-9");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: slot level must be 1-9");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown ability: luck");
        assert!(matches!(err, DomainError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: Unknown ability: luck");
    }
}
