//! Topological statistics for braid words.
//!
//! [`BraidAnalysis`] is computed in one pass over the tokens plus one pass over
//! the aggregated generator counts. It backs both the execution validation
//! policy ([`validate_braid`]) and the verification report
//! ([`verify_topological_mapping`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{BraidError, BraidResult};
use crate::token::{ParsedBraid, parse_braid_word};

/// Minimum number of tokens a braid needs before circuit work.
pub const MIN_TOKENS: usize = 3;

/// Minimum number of distinct generators a braid needs before circuit work.
pub const MIN_DISTINCT_GENERATORS: usize = 2;

/// Largest generator index accepted for analysis.
pub const MAX_GENERATOR_INDEX: u32 = 1024;

/// How the strands of a braid are tied together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandConnectivity {
    /// At least two generators and no gaps in the generator range.
    Connected(u32),
    /// A single generator, or gaps in the generator range.
    Partial(u32),
}

impl StrandConnectivity {
    /// Whether every strand participates in a crossing chain.
    pub fn is_connected(&self) -> bool {
        matches!(self, StrandConnectivity::Connected(_))
    }
}

impl fmt::Display for StrandConnectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandConnectivity::Connected(n) => write!(f, "connected-{n}-strand"),
            StrandConnectivity::Partial(n) => write!(f, "partial-{n}-strand"),
        }
    }
}

impl Serialize for StrandConnectivity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serialize generator counts as `{"s1": n, "s2": m, ...}` in ascending index order.
fn serialize_generator_counts<S: Serializer>(
    counts: &BTreeMap<u32, usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().map(|(g, n)| (format!("s{g}"), n)))
}

/// Read-only snapshot of a braid word's topological statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BraidAnalysis {
    /// The parsed tokens.
    #[serde(skip)]
    pub parsed_braid: ParsedBraid,
    /// Number of tokens.
    pub token_count: usize,
    /// Occurrences per generator index, ascending.
    #[serde(serialize_with = "serialize_generator_counts")]
    pub generator_counts: BTreeMap<u32, usize>,
    /// Number of inverse tokens.
    pub inverse_count: usize,
    /// Positive minus inverse tokens.
    pub net_writhe: i64,
    /// Adjacent token pairs with differing generator index.
    pub generator_switches: usize,
    /// `switches / max(token_count - 1, 1)`, rounded half-to-even to three decimals.
    pub alternation_ratio: f64,
    /// Number of distinct generator indices.
    pub unique_generator_count: usize,
    /// Largest generator index.
    pub max_generator_index: u32,
    /// `max_generator_index + 1`.
    pub strand_count: u32,
    /// Labels of generators missing below the maximum.
    pub missing_generators: Vec<String>,
    /// Whether every index in `1..=max_generator_index` occurs.
    pub is_contiguous_generator_range: bool,
    /// Connectivity classification.
    pub strand_connectivity: StrandConnectivity,
    /// One ancilla plus one qubit per strand.
    pub required_qubits: u32,
}

impl BraidAnalysis {
    /// Analyze already-parsed tokens.
    pub fn from_parsed(parsed_braid: ParsedBraid) -> BraidResult<Self> {
        if parsed_braid.is_empty() {
            return Err(BraidError::EmptyInput);
        }

        let mut generator_counts: BTreeMap<u32, usize> = BTreeMap::new();
        let mut inverse_count = 0usize;
        let mut net_writhe = 0i64;
        let mut generator_switches = 0usize;
        let mut previous: Option<u32> = None;

        for token in &parsed_braid {
            *generator_counts.entry(token.generator).or_insert(0) += 1;
            if token.inverse {
                inverse_count += 1;
            }
            net_writhe += token.sign();

            if previous.is_some_and(|p| p != token.generator) {
                generator_switches += 1;
            }
            previous = Some(token.generator);
        }

        let max_generator_index = generator_counts.keys().next_back().copied().unwrap_or(0);
        if max_generator_index > MAX_GENERATOR_INDEX {
            return Err(BraidError::GeneratorOutOfRange {
                generator: max_generator_index,
                max: MAX_GENERATOR_INDEX,
            });
        }

        let missing_generators: Vec<String> = (1..=max_generator_index)
            .filter(|g| !generator_counts.contains_key(g))
            .map(|g| format!("s{g}"))
            .collect();

        let token_count = parsed_braid.len();
        let unique_generator_count = generator_counts.len();
        let strand_count = max_generator_index + 1;
        let is_contiguous_generator_range = missing_generators.is_empty();

        let denominator = token_count.saturating_sub(1).max(1) as f64;
        let alternation_ratio = round3(generator_switches as f64 / denominator);

        let strand_connectivity =
            if unique_generator_count >= MIN_DISTINCT_GENERATORS && is_contiguous_generator_range {
                StrandConnectivity::Connected(strand_count)
            } else {
                StrandConnectivity::Partial(strand_count)
            };

        Ok(Self {
            parsed_braid,
            token_count,
            generator_counts,
            inverse_count,
            net_writhe,
            generator_switches,
            alternation_ratio,
            unique_generator_count,
            max_generator_index,
            strand_count,
            missing_generators,
            is_contiguous_generator_range,
            strand_connectivity,
            required_qubits: strand_count + 1,
        })
    }

    /// Apply the execution validation policy.
    ///
    /// Rejects fewer than three tokens, fewer than two distinct generators,
    /// and non-contiguous generator ranges, in that order.
    pub fn validate(&self) -> BraidResult<()> {
        match self.violation() {
            Some(Violation::TooFewTokens) => Err(BraidError::TooFewTokens {
                found: self.token_count,
            }),
            Some(Violation::TooFewDistinctGenerators) => {
                Err(BraidError::TooFewDistinctGenerators)
            }
            Some(Violation::NonContiguous) => Err(BraidError::NonContiguousGenerators {
                max_generator: self.max_generator_index,
                missing: self.missing_generators.clone(),
            }),
            None => Ok(()),
        }
    }

    fn violation(&self) -> Option<Violation> {
        if self.token_count < MIN_TOKENS {
            Some(Violation::TooFewTokens)
        } else if self.unique_generator_count < MIN_DISTINCT_GENERATORS {
            Some(Violation::TooFewDistinctGenerators)
        } else if !self.is_contiguous_generator_range {
            Some(Violation::NonContiguous)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Violation {
    TooFewTokens,
    TooFewDistinctGenerators,
    NonContiguous,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

/// Parse and analyze a braid word.
pub fn analyze_braid_word(braid_word: &str) -> BraidResult<BraidAnalysis> {
    BraidAnalysis::from_parsed(parse_braid_word(braid_word)?)
}

/// Parse, analyze, and validate a braid word for circuit work.
pub fn validate_braid(braid_word: &str) -> BraidResult<BraidAnalysis> {
    let analysis = analyze_braid_word(braid_word)?;
    analysis.validate()?;
    Ok(analysis)
}

/// Outcome of topological verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// All checks passed.
    Verified,
    /// At least one check failed.
    Failed,
}

/// Analysis fields reported alongside a verification verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationEvidence {
    pub token_count: usize,
    #[serde(serialize_with = "serialize_generator_counts")]
    pub generator_counts: BTreeMap<u32, usize>,
    pub inverse_count: usize,
    pub net_writhe: i64,
    pub generator_switches: usize,
    pub alternation_ratio: f64,
    pub unique_generator_count: usize,
    pub max_generator_index: u32,
    pub strand_count: u32,
    pub missing_generators: Vec<String>,
    pub strand_connectivity: StrandConnectivity,
}

impl From<&BraidAnalysis> for VerificationEvidence {
    fn from(a: &BraidAnalysis) -> Self {
        Self {
            token_count: a.token_count,
            generator_counts: a.generator_counts.clone(),
            inverse_count: a.inverse_count,
            net_writhe: a.net_writhe,
            generator_switches: a.generator_switches,
            alternation_ratio: a.alternation_ratio,
            unique_generator_count: a.unique_generator_count,
            max_generator_index: a.max_generator_index,
            strand_count: a.strand_count,
            missing_generators: a.missing_generators.clone(),
            strand_connectivity: a.strand_connectivity,
        }
    }
}

/// Verdict of [`verify_topological_mapping`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub is_verified: bool,
    pub status: VerificationStatus,
    pub detail: String,
    pub evidence: VerificationEvidence,
}

/// Check a braid word against the validation policy and report the evidence.
///
/// Policy violations are reported as data (`is_verified = false`); only
/// parse errors and out-of-range generators are returned as `Err`.
pub fn verify_topological_mapping(braid_word: &str) -> BraidResult<VerificationReport> {
    let analysis = analyze_braid_word(braid_word)?;
    let evidence = VerificationEvidence::from(&analysis);

    let (status, detail) = match analysis.violation() {
        Some(Violation::TooFewTokens) => (
            VerificationStatus::Failed,
            "Verification failed: braid word must contain at least three generators.".to_string(),
        ),
        Some(Violation::TooFewDistinctGenerators) => (
            VerificationStatus::Failed,
            "Verification failed: braid word must include at least two distinct generators \
             to demonstrate strand connectivity."
                .to_string(),
        ),
        Some(Violation::NonContiguous) => (
            VerificationStatus::Failed,
            format!(
                "Verification failed: braid word must use contiguous generators from s1 through s{}. Missing: {}.",
                analysis.max_generator_index,
                analysis.missing_generators.join(", ")
            ),
        ),
        None => (
            VerificationStatus::Verified,
            format!(
                "Topological verification passed with connected {}-strand braid evidence.",
                analysis.strand_count
            ),
        ),
    };

    Ok(VerificationReport {
        is_verified: status == VerificationStatus::Verified,
        status,
        detail,
        evidence,
    })
}
