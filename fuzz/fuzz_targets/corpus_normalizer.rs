#![no_main]

use libfuzzer_sys::fuzz_target;
use signstat::context::{get_sign_context, Aggregation};
use signstat::sequence::{compute_markov_stats, normalize_sequences};
use signstat::transition::TransitionStats;

fuzz_target!(|data: &[u8]| {
    // Any parseable JSON must either normalize or be rejected, never panic
    let Ok(raw) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(corpus) = normalize_sequences(&raw) else {
        return;
    };

    let payload = compute_markov_stats(&corpus);
    assert!(payload.to_json_pretty().is_ok());

    let stats = TransitionStats::from(raw);
    for seq in corpus.iter().filter(|seq| !seq.is_empty()) {
        let _ = get_sign_context(&seq[0], Some(seq), Some(&stats), Aggregation::Max);
    }
});
