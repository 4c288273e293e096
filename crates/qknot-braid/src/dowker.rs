//! Dowker notation normalization and compilation to braid words.
//!
//! A Dowker sequence of length `n` is a list of nonzero even integers whose
//! absolute values are exactly `{2, 4, ..., 2n}`. Known sequences compile
//! through the static [`catalog`](crate::catalog); everything else goes
//! through a deterministic generator-cycling fallback, so compilation is
//! total over validated input.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::catalog;
use crate::error::{BraidError, BraidResult};

/// Root of unity used when the catalog has no entry.
pub const DEFAULT_ROOT_OF_UNITY: u32 = 5;

/// Minimum number of Dowker entries.
const MIN_ENTRIES: usize = 3;

/// A validated Dowker sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DowkerSequence(Vec<i64>);

impl DowkerSequence {
    /// Normalize and validate Dowker notation.
    ///
    /// Commas are treated as whitespace. Checks, in order: non-blank, at
    /// least three entries, each entry an integer, nonzero, even; absolute
    /// values unique; absolute values equal to `{2, 4, ..., 2n}`.
    pub fn parse(notation: &str) -> BraidResult<Self> {
        if notation.trim().is_empty() {
            return Err(BraidError::EmptyDowker);
        }

        let normalized = notation.replace(',', " ");
        let raw_tokens: Vec<&str> = normalized.split_whitespace().collect();
        if raw_tokens.len() < MIN_ENTRIES {
            return Err(BraidError::DowkerTooShort);
        }

        let mut values = Vec::with_capacity(raw_tokens.len());
        for token in raw_tokens {
            let value: i64 = token.parse().map_err(|_| BraidError::DowkerNotInteger {
                token: token.to_string(),
            })?;
            if value == 0 {
                return Err(BraidError::DowkerZero);
            }
            if value % 2 != 0 {
                return Err(BraidError::DowkerOdd {
                    token: token.to_string(),
                });
            }
            values.push(value);
        }

        let mut seen: FxHashSet<u64> = FxHashSet::default();
        if !values.iter().all(|v| seen.insert(v.unsigned_abs())) {
            return Err(BraidError::DowkerDuplicate);
        }

        // With n unique even absolute values, completeness reduces to a bound check.
        let upper = 2 * values.len() as u64;
        if values.iter().any(|v| v.unsigned_abs() > upper) {
            return Err(BraidError::DowkerIncomplete { upper });
        }

        Ok(Self(values))
    }

    /// The signed entries.
    pub fn values(&self) -> &[i64] {
        &self.0
    }

    /// Number of crossings (= number of entries).
    pub fn crossing_count(&self) -> usize {
        self.0.len()
    }

    /// Compile to a braid word via the catalog or the fallback scheme.
    pub fn compile(&self) -> DowkerCompilation {
        let (knot_name, braid_word, root_of_unity, is_catalog_match) =
            match catalog::lookup(&self.0) {
                Some(entry) => (
                    entry.knot_name.to_string(),
                    entry.braid_word.to_string(),
                    entry.root_of_unity,
                    true,
                ),
                None => (
                    format!("Dowker Knot ({} crossings)", self.crossing_count()),
                    self.fallback_braid_word(),
                    DEFAULT_ROOT_OF_UNITY,
                    false,
                ),
            };

        DowkerCompilation {
            dowker_notation_normalized: self.to_string(),
            crossing_count: self.crossing_count(),
            knot_name,
            braid_word,
            root_of_unity,
            is_catalog_match,
        }
    }

    /// Cycle generators `s1..s(k-1)` over the entries, where
    /// `k = max(3, n / 2 + 2)` strands; negative entries become inverses.
    fn fallback_braid_word(&self) -> String {
        let strand_count = (self.0.len() / 2 + 2).max(3);
        let max_generator = strand_count - 1;

        self.0
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let generator = index % max_generator + 1;
                if *value < 0 {
                    format!("s{generator}^-1")
                } else {
                    format!("s{generator}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for DowkerSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Output of Dowker compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DowkerCompilation {
    /// Space-separated signed entries.
    pub dowker_notation_normalized: String,
    /// Number of crossings.
    pub crossing_count: usize,
    /// Catalog name or `Dowker Knot (n crossings)`.
    pub knot_name: String,
    /// Compiled braid word.
    pub braid_word: String,
    /// Root of unity for the evaluation angle.
    pub root_of_unity: u32,
    /// Whether the catalog supplied the result.
    pub is_catalog_match: bool,
}

/// Normalize, validate, and compile Dowker notation in one step.
pub fn compile_dowker_notation(notation: &str) -> BraidResult<DowkerCompilation> {
    Ok(DowkerSequence::parse(notation)?.compile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::validate_braid;

    #[test]
    fn test_trefoil_catalog_match() {
        let result = compile_dowker_notation("4 6 2").unwrap();
        assert_eq!(result.dowker_notation_normalized, "4 6 2");
        assert_eq!(result.crossing_count, 3);
        assert_eq!(result.knot_name, "Trefoil Knot (3_1)");
        assert_eq!(result.braid_word, "s1 s2^-1 s1 s2^-1");
        assert_eq!(result.root_of_unity, 5);
        assert!(result.is_catalog_match);
    }

    #[test]
    fn test_commas_and_signs_normalized() {
        let result = compile_dowker_notation(" 4,-6, 2 ").unwrap();
        assert_eq!(result.dowker_notation_normalized, "4 -6 2");
        // Signed lookup: the mirrored sequence is not a catalog key.
        assert!(!result.is_catalog_match);
        assert_eq!(result.braid_word, "s1 s2^-1 s1");
    }

    #[test]
    fn test_fallback_for_six_crossings() {
        let result = compile_dowker_notation("2 4 6 8 10 12").unwrap();
        assert!(!result.is_catalog_match);
        assert_eq!(result.crossing_count, 6);
        assert_eq!(result.knot_name, "Dowker Knot (6 crossings)");
        assert_eq!(result.root_of_unity, DEFAULT_ROOT_OF_UNITY);
        // 6 entries → 5 strands → generators s1..s4 cycled.
        assert_eq!(result.braid_word, "s1 s2 s3 s4 s1 s2");
    }

    #[test]
    fn test_fallback_output_is_valid_braid() {
        for notation in ["2 4 6", "-2 4 -6 8", "2 4 6 8 10 12 14 16 18"] {
            let result = compile_dowker_notation(notation).unwrap();
            validate_braid(&result.braid_word).unwrap();
        }
    }

    #[test]
    fn test_rejects_odd_value() {
        let err = compile_dowker_notation("4 3 2").unwrap_err();
        assert!(err.to_string().contains("must be even"));
    }

    #[test]
    fn test_rejects_incomplete_sequence() {
        let err = compile_dowker_notation("4 10 2").unwrap_err();
        assert!(err.to_string().contains("complete even sequence"));
    }

    #[test]
    fn test_other_rejections() {
        assert_eq!(compile_dowker_notation("  "), Err(BraidError::EmptyDowker));
        assert_eq!(compile_dowker_notation("2 4"), Err(BraidError::DowkerTooShort));
        assert_eq!(compile_dowker_notation("2 0 4"), Err(BraidError::DowkerZero));
        assert_eq!(compile_dowker_notation("2 -2 4"), Err(BraidError::DowkerDuplicate));
        assert!(matches!(
            compile_dowker_notation("2 four 6"),
            Err(BraidError::DowkerNotInteger { .. })
        ));
    }
}
