//! Error types for the biclustering engine.
//!
//! Every hard failure aborts the current operation and surfaces one of the
//! variants below; recoverable conditions (a rejected seed, an undersized
//! block, an overlap-filtered block) are counted and continued past inside
//! the algorithm.

use std::error::Error;
use std::fmt;

/// Errors surfaced by the engine operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BiclusterError {
    /// A tunable is outside its admissible range.
    InvalidParameter(String),
    /// Input arrays disagree on length or shape.
    DimensionMismatch(String),
    /// A matrix with zero rows or zero columns was supplied.
    EmptyInput,
    /// The number of rank levels resolved to zero. Internal invariant;
    /// should be unreachable once dimensions have been validated.
    ZeroDivide,
}

impl fmt::Display for BiclusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiclusterError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
            BiclusterError::DimensionMismatch(msg) => {
                write!(f, "Dimension mismatch: {}", msg)
            }
            BiclusterError::EmptyInput => {
                write!(f, "Input matrix has zero rows or zero columns")
            }
            BiclusterError::ZeroDivide => {
                write!(f, "Number of rank levels resolved to zero")
            }
        }
    }
}

impl Error for BiclusterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_context() {
        let err = BiclusterError::InvalidParameter("tolerance 1.5 not in (0.5, 1.0]".into());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid parameter"));
        assert!(msg.contains("tolerance"));
    }

    #[test]
    fn test_empty_input_display() {
        let msg = format!("{}", BiclusterError::EmptyInput);
        assert!(msg.contains("zero rows"));
    }
}
