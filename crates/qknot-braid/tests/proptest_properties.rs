//! Property-based tests for braid analysis and Dowker compilation.

use proptest::prelude::*;
use qknot_braid::{
    BraidToken, ParsedBraid, analyze_braid_word, compile_dowker_notation, validate_braid,
};

/// Random braid words over generators `s1..s8`.
fn arb_braid() -> impl Strategy<Value = ParsedBraid> {
    prop::collection::vec((1_u32..=8, any::<bool>()), 1..=24).prop_map(|pairs| {
        ParsedBraid::from_tokens(
            pairs
                .into_iter()
                .map(|(generator, inverse)| BraidToken { generator, inverse })
                .collect(),
        )
    })
}

/// Random valid Dowker sequences: a shuffled `{2, 4, ..., 2n}` with random signs.
fn arb_dowker() -> impl Strategy<Value = String> {
    (3_usize..=12)
        .prop_flat_map(|n| {
            let values: Vec<i64> = (1..=n as i64).map(|k| 2 * k).collect();
            (
                Just(values).prop_shuffle(),
                prop::collection::vec(any::<bool>(), n),
            )
        })
        .prop_map(|(values, negate)| {
            values
                .iter()
                .zip(negate)
                .map(|(v, neg)| if neg { (-v).to_string() } else { v.to_string() })
                .collect::<Vec<_>>()
                .join(", ")
        })
}

proptest! {
    #[test]
    fn required_qubits_is_max_generator_plus_two(braid in arb_braid()) {
        let analysis = analyze_braid_word(&braid.to_string()).unwrap();
        let max = braid.iter().map(|t| t.generator).max().unwrap();
        prop_assert_eq!(analysis.max_generator_index, max);
        prop_assert_eq!(analysis.required_qubits, max + 2);
    }

    #[test]
    fn writhe_and_counts_are_consistent(braid in arb_braid()) {
        let analysis = analyze_braid_word(&braid.to_string()).unwrap();
        let total: usize = analysis.generator_counts.values().sum();
        prop_assert_eq!(total, analysis.token_count);
        prop_assert_eq!(
            analysis.net_writhe,
            analysis.token_count as i64 - 2 * analysis.inverse_count as i64
        );
        prop_assert!(analysis.generator_switches < analysis.token_count);
        prop_assert!((0.0..=1.0).contains(&analysis.alternation_ratio));
    }

    #[test]
    fn rendered_braid_reparses_identically(braid in arb_braid()) {
        let reparsed: ParsedBraid = braid.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, braid);
    }

    #[test]
    fn valid_dowker_always_compiles_to_valid_braid(notation in arb_dowker()) {
        let first = compile_dowker_notation(&notation).unwrap();
        let second = compile_dowker_notation(&notation).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(validate_braid(&first.braid_word).is_ok());
        prop_assert_eq!(first.crossing_count, notation.split(',').count());
    }
}
