//! Error types for the braid crate.

use thiserror::Error;

/// Errors raised while parsing, validating, or compiling knot notation.
///
/// Every variant is an input error: it is detected locally, never retried,
/// and carries the exact message shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BraidError {
    /// The braid word was empty or whitespace only.
    #[error("Braid word cannot be empty.")]
    EmptyInput,

    /// A token did not match `sN` or `sN^-1`.
    #[error(
        "Unsupported braid token '{token}'. Supported tokens follow sN or sN^-1, where N is a positive integer."
    )]
    Grammar {
        /// The offending token, verbatim.
        token: String,
    },

    /// Fewer than three generator tokens.
    #[error("Braid word must contain at least three generators before execution.")]
    TooFewTokens {
        /// Number of tokens found.
        found: usize,
    },

    /// Only one distinct generator index was used.
    #[error("Braid word must include at least two distinct generators before execution.")]
    TooFewDistinctGenerators,

    /// Generator indices have gaps below the maximum index.
    #[error(
        "Braid word must use contiguous generators from s1 through s{max_generator}. Missing: {}.",
        .missing.join(", ")
    )]
    NonContiguousGenerators {
        /// Largest generator index in the word.
        max_generator: u32,
        /// Missing generator labels (`s2`, `s4`, ...).
        missing: Vec<String>,
    },

    /// A generator index is beyond what circuit planning supports.
    #[error("Braid generator s{generator} exceeds the supported maximum of s{max}.")]
    GeneratorOutOfRange {
        /// The offending generator index.
        generator: u32,
        /// Largest accepted index.
        max: u32,
    },

    /// The Dowker notation was empty or whitespace only.
    #[error("Dowker notation cannot be empty.")]
    EmptyDowker,

    /// Fewer than three Dowker entries.
    #[error("Dowker notation must include at least three integer entries.")]
    DowkerTooShort,

    /// A Dowker token is not an integer.
    #[error("Dowker notation token '{token}' is not a valid integer.")]
    DowkerNotInteger {
        /// The offending token.
        token: String,
    },

    /// A Dowker entry is zero.
    #[error("Dowker notation cannot contain zero values.")]
    DowkerZero,

    /// A Dowker entry is odd.
    #[error("Dowker notation token '{token}' must be even.")]
    DowkerOdd {
        /// The offending token.
        token: String,
    },

    /// Two Dowker entries share an absolute value.
    #[error("Dowker notation values must be unique by absolute value.")]
    DowkerDuplicate,

    /// Absolute values do not form `{2, 4, ..., 2n}`.
    #[error("Dowker notation absolute values must be a complete even sequence from 2 to {upper}.")]
    DowkerIncomplete {
        /// Expected upper bound `2n`.
        upper: u64,
    },
}

impl BraidError {
    /// Whether this error is a caller fault (always true for notation errors).
    pub fn is_input_error(&self) -> bool {
        true
    }
}

/// Result type for braid operations.
pub type BraidResult<T> = Result<T, BraidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_error_names_token() {
        let err = BraidError::Grammar {
            token: "x3".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported braid token 'x3'. Supported tokens follow sN or sN^-1, where N is a positive integer."
        );
    }

    #[test]
    fn test_non_contiguous_lists_missing() {
        let err = BraidError::NonContiguousGenerators {
            max_generator: 5,
            missing: vec!["s2".into(), "s4".into()],
        };
        assert_eq!(
            err.to_string(),
            "Braid word must use contiguous generators from s1 through s5. Missing: s2, s4."
        );
    }

    #[test]
    fn test_dowker_incomplete_names_upper_bound() {
        let err = BraidError::DowkerIncomplete { upper: 6 };
        assert!(err.to_string().contains("complete even sequence from 2 to 6"));
        assert!(err.is_input_error());
    }
}
