//! Decoding of sampler payloads into measurement counts.

use std::collections::BTreeMap;

use qknot_hal::{Counts, PubResult, SamplerResult};

use crate::api::{JobResultResponse, PubPayload, RegisterSamples};

/// Convert a results payload into per-register counts.
///
/// V2 registers become named count containers. V1 pre-aggregated counts are
/// exposed as the joined container.
pub fn decode_results(response: &JobResultResponse) -> SamplerResult {
    SamplerResult {
        pubs: response.results.iter().map(decode_pub).collect(),
    }
}

fn decode_pub(payload: &PubPayload) -> PubResult {
    let joined = payload.counts.as_ref().map(|raw| {
        let width = infer_bit_width(raw.keys().map(String::as_str));
        let mut counts = Counts::new();
        for (bits, n) in raw {
            *counts.entry(hex_to_binary(bits, width)).or_insert(0) += n;
        }
        counts
    });

    let data = match (&payload.data, &joined) {
        (Some(registers), _) => Some(
            registers
                .iter()
                .map(|(name, register)| (name.clone(), register_counts(register)))
                .collect(),
        ),
        // V1 results have no registers; keep an empty data section so the joined
        // counts are still reachable.
        (None, Some(_)) => Some(BTreeMap::new()),
        (None, None) => None,
    };

    PubResult { data, joined }
}

fn register_counts(register: &RegisterSamples) -> Counts {
    let width = register
        .num_bits
        .unwrap_or_else(|| infer_bit_width(register.samples.iter().map(String::as_str)));
    let mut counts = Counts::new();
    for sample in &register.samples {
        *counts.entry(hex_to_binary(sample, width)).or_insert(0) += 1;
    }
    counts
}

fn hex_digits(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Bits needed for the largest sample; at least one.
fn infer_bit_width<'a>(samples: impl IntoIterator<Item = &'a str>) -> usize {
    let max = samples
        .into_iter()
        .filter_map(|s| u64::from_str_radix(hex_digits(s), 16).ok())
        .max()
        .unwrap_or(0);
    (64 - max.leading_zeros() as usize).max(1)
}

/// Hex sample to a zero-padded bitstring. Non-hex input passes through.
fn hex_to_binary(hex: &str, width: usize) -> String {
    let digits = hex_digits(hex);
    match u64::from_str_radix(digits, 16) {
        Ok(value) => format!("{value:0>width$b}"),
        Err(_) => digits.to_string(),
    }
}
