//! Property-based tests for the statistics engine and context assembly
//!
//! Core properties tested:
//! 1. Unigram totals match corpus length
//! 2. Transition probabilities are bigram / unigram ratios
//! 3. Payload is independent of inscription order
//! 4. Normalization is idempotent
//! 5. Context assembly is total over arbitrary inputs

use proptest::prelude::*;
use signstat::context::{get_sign_context, Aggregation, Follows};
use signstat::sequence::{compute_markov_stats, make_ngram_key, normalize_sequences};
use signstat::transition::TransitionStats;

fn sign() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["M1", "M2", "M3", "M89", "M305"]).prop_map(str::to_string)
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(sign(), 0..8), 0..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_unigram_total_matches_corpus_length(corpus in corpus_strategy()) {
        let stats = compute_markov_stats(&corpus);

        let total: usize = stats.unigrams.values().sum();
        let expected: usize = corpus.iter().map(Vec::len).sum();
        prop_assert_eq!(total, expected);

        let positional: usize = stats
            .position_counts
            .values()
            .flat_map(|positions| positions.values())
            .sum();
        prop_assert_eq!(positional, expected);
    }

    #[test]
    fn prop_transition_is_bigram_over_unigram(corpus in corpus_strategy()) {
        let stats = compute_markov_stats(&corpus);

        prop_assert_eq!(stats.bigrams.len(), stats.transition_probs.len());
        for seq in &corpus {
            for pair in seq.windows(2) {
                let key = make_ngram_key(pair);
                let expected = stats.bigrams[&key] as f64 / stats.unigrams[&pair[0]] as f64;
                prop_assert!((stats.transition_probs[&key] - expected).abs() < 1e-12);
                prop_assert!(stats.transition_probs[&key] > 0.0);
                prop_assert!(stats.transition_probs[&key] <= 1.0);
            }
        }
    }

    #[test]
    fn prop_payload_independent_of_order(corpus in corpus_strategy(), seed in any::<u64>()) {
        let mut shuffled = corpus.clone();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }

        let a = compute_markov_stats(&corpus).to_json_pretty().unwrap();
        let b = compute_markov_stats(&shuffled).to_json_pretty().unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_normalize_idempotent(corpus in corpus_strategy()) {
        let value = serde_json::to_value(&corpus).unwrap();
        let normalized = normalize_sequences(&value).unwrap();
        prop_assert_eq!(&normalized, &corpus);

        let wrapped = serde_json::json!({"sequences": normalized});
        prop_assert_eq!(normalize_sequences(&wrapped).unwrap(), corpus);
    }

    #[test]
    fn prop_context_assembly_total(
        target in sign(),
        sequence in prop::option::of(prop::collection::vec(sign(), 0..12)),
        with_stats in any::<bool>(),
        use_max in any::<bool>(),
    ) {
        let table = compute_markov_stats(sequence.as_slice());
        let stats = TransitionStats::from(&table);
        let aggregation = if use_max { Aggregation::Max } else { Aggregation::Mean };

        let ctx = get_sign_context(
            &target,
            sequence.as_deref(),
            with_stats.then_some(&stats),
            aggregation,
        );

        let evidence = ctx.transition_evidence.as_ref().unwrap();
        prop_assert_eq!(evidence.occurrences.len(), ctx.occurrence_indices.len());
        prop_assert!(ctx.occurrence_indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(ctx.follows_prob, evidence.probability);

        for (occurrence, &index) in evidence.occurrences.iter().zip(&ctx.occurrence_indices) {
            prop_assert_eq!(occurrence.index, index);
            let seq = sequence.as_ref().unwrap();
            prop_assert_eq!(&seq[index], &target);
            prop_assert_eq!(occurrence.next_sign.as_ref(), seq.get(index + 1));
        }

        match ctx.occurrence_indices.len() {
            0 => {
                prop_assert_eq!(&ctx.follows, &None);
            }
            1 => {
                prop_assert!(matches!(ctx.follows, Some(Follows::Single(_))));
            }
            n => {
                prop_assert!(matches!(&ctx.follows, Some(Follows::Many(v)) if v.len() == n));
            }
        }

        if let Some(p) = ctx.follows_prob {
            prop_assert!((0.0..=1.0).contains(&p));
        }
        if !with_stats {
            prop_assert_eq!(ctx.follows_prob, None);
        }
    }
}
