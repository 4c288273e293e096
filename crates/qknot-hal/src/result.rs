//! Sampler results, count extraction, and expectation formatting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Measurement outcome (bitstring) to shot count.
pub type Counts = BTreeMap<String, u64>;

/// Register names tried before any other container, in order.
const PREFERRED_CONTAINERS: &[&str] = &["c", "meas", "m", "memory"];

/// Result of one primitive unit of work (one circuit).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubResult {
    /// Counts per classical register; `None` when the result has no data section.
    pub data: Option<BTreeMap<String, Counts>>,
    /// Counts over all registers combined, when the service provides them.
    pub joined: Option<Counts>,
}

impl PubResult {
    /// Result with a single named register.
    pub fn with_register(name: impl Into<String>, counts: Counts) -> Self {
        Self {
            data: Some(BTreeMap::from([(name.into(), counts)])),
            joined: None,
        }
    }

    /// Find the first non-empty counts container.
    ///
    /// Tries the conventional register names, then every other public
    /// register, then the joined counts.
    pub fn extract_counts(&self) -> HalResult<&Counts> {
        let data = self.data.as_ref().ok_or(HalError::MissingMeasurementData)?;

        let preferred = PREFERRED_CONTAINERS.iter().filter_map(|name| data.get(*name));
        let others = data
            .iter()
            .filter(|(name, _)| !name.starts_with('_') && !PREFERRED_CONTAINERS.contains(&name.as_str()))
            .map(|(_, counts)| counts);

        preferred
            .chain(others)
            .chain(self.joined.iter())
            .find(|counts| !counts.is_empty())
            .ok_or(HalError::CountsUnavailable)
    }
}

/// Result of a sampler job: one entry per submitted circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerResult {
    /// Per-circuit results in submission order.
    pub pubs: Vec<PubResult>,
}

impl SamplerResult {
    /// Counts of the first circuit.
    pub fn first_counts(&self) -> HalResult<&Counts> {
        self.pubs
            .first()
            .ok_or(HalError::MissingMeasurementData)?
            .extract_counts()
    }
}

/// One outcome with its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbability {
    /// Bitstring left-padded with zeros to width 2.
    pub name: String,
    /// `count / total`, or 0 when the total is 0.
    pub probability: f64,
}

/// Expectation and per-outcome probabilities of an ancilla measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSummary {
    /// Outcomes in bitstring order.
    pub counts: Vec<OutcomeProbability>,
    /// `(n0 - n1) / (n0 + n1)`.
    pub expectation_value: f64,
    /// Placeholder polynomial string built from the expectation.
    pub jones_polynomial: String,
}

impl ExpectationSummary {
    /// Summarize single-bit ancilla counts.
    ///
    /// The total is `count("0") + count("1")`; outcomes with other labels are
    /// listed but not part of the total.
    pub fn from_counts(counts: &Counts) -> Self {
        let zero = counts.get("0").copied().unwrap_or(0);
        let one = counts.get("1").copied().unwrap_or(0);
        let total = zero + one;

        let ratio = |n: u64| if total > 0 { n as f64 / total as f64 } else { 0.0 };
        let expectation_value = if total > 0 {
            (zero as f64 - one as f64) / total as f64
        } else {
            0.0
        };

        let counts = counts
            .iter()
            .map(|(bits, n)| OutcomeProbability {
                name: format!("{bits:0>2}"),
                probability: ratio(*n),
            })
            .collect();

        Self {
            counts,
            expectation_value,
            jones_polynomial: format!("V(t) = {expectation_value:.3}t^-4 + t^-3 + t^-1"),
        }
    }
}
