//! Shape-tolerant transition probability lookup
//!
//! Transition tables reach the context layer in several encodings: tuple
//! keyed maps, nested `current -> next -> p` maps, and JSON documents
//! produced by the statistics engine or by external tools. [`TransitionStats`]
//! names each encoding explicitly and [`get_transition_prob`] resolves a pair
//! against whichever one it is given.

use crate::sequence::{make_ngram_key, split_bigram_key, Sign, StatsPayload};
use serde_json::Value;
use std::collections::HashMap;

/// A transition table in one of the accepted encodings
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionStats {
    /// Keyed by the literal `(current, next)` pair
    Pairs(HashMap<(Sign, Sign), f64>),

    /// `current -> (next -> probability)`
    Nested(HashMap<Sign, HashMap<Sign, f64>>),

    /// Deserialized JSON: a nested object with string keys, a flat object
    /// keyed by `"current|next"`, or a full statistics payload
    Json(Value),
}

impl TransitionStats {
    /// Resolves the probability that `next` follows `current`
    pub fn lookup(&self, current: &str, next: &str) -> Option<f64> {
        let prob = match self {
            TransitionStats::Pairs(table) => table
                .get(&(current.to_string(), next.to_string()))
                .copied(),
            TransitionStats::Nested(table) => table.get(current)?.get(next).copied(),
            TransitionStats::Json(value) => lookup_json(value, current, next),
        };
        prob.filter(|p| p.is_finite())
    }
}

impl From<&StatsPayload> for TransitionStats {
    fn from(payload: &StatsPayload) -> Self {
        let mut nested: HashMap<Sign, HashMap<Sign, f64>> = HashMap::new();
        for (key, &prob) in &payload.transition_probs {
            if let Some((current, next)) = split_bigram_key(key) {
                nested
                    .entry(current.to_string())
                    .or_default()
                    .insert(next.to_string(), prob);
            }
        }
        TransitionStats::Nested(nested)
    }
}

impl From<HashMap<(Sign, Sign), f64>> for TransitionStats {
    fn from(table: HashMap<(Sign, Sign), f64>) -> Self {
        TransitionStats::Pairs(table)
    }
}

impl From<HashMap<Sign, HashMap<Sign, f64>>> for TransitionStats {
    fn from(table: HashMap<Sign, HashMap<Sign, f64>>) -> Self {
        TransitionStats::Nested(table)
    }
}

impl From<Value> for TransitionStats {
    fn from(value: Value) -> Self {
        TransitionStats::Json(value)
    }
}

/// Looks up the transition probability for `(current, next)`
///
/// Returns `None` when no table is given or the pair cannot be resolved.
/// Missing evidence is expected and never an error.
///
/// # Example
/// ```
/// use signstat::transition::{get_transition_prob, TransitionStats};
///
/// let stats = TransitionStats::from(serde_json::json!({"M1": {"M2": 0.7}}));
///
/// assert_eq!(get_transition_prob(Some(&stats), "M1", "M2"), Some(0.7));
/// assert_eq!(get_transition_prob(Some(&stats), "M2", "M1"), None);
/// assert_eq!(get_transition_prob(None, "M1", "M2"), None);
/// ```
pub fn get_transition_prob(
    transition_stats: Option<&TransitionStats>,
    current: &str,
    next: &str,
) -> Option<f64> {
    transition_stats?.lookup(current, next)
}

/// Fallback chain over JSON encodings: nested, flat n-gram key, then the
/// same two inside a payload's `transition_probs`
fn lookup_json(value: &Value, current: &str, next: &str) -> Option<f64> {
    let table = value.as_object()?;

    let nested = table
        .get(current)
        .and_then(|row| row.get(next))
        .and_then(Value::as_f64);
    if nested.is_some() {
        return nested;
    }

    let flat = table
        .get(&make_ngram_key(&[current, next]))
        .and_then(Value::as_f64);
    if flat.is_some() {
        return flat;
    }

    match table.get("transition_probs") {
        Some(inner @ Value::Object(_)) => lookup_json(inner, current, next),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::compute_markov_stats;
    use serde_json::json;

    fn pair(a: &str, b: &str) -> (Sign, Sign) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_lookup_pairs() {
        let stats = TransitionStats::from(HashMap::from([(pair("M1", "M2"), 0.7)]));

        assert_eq!(get_transition_prob(Some(&stats), "M1", "M2"), Some(0.7));
        assert_eq!(get_transition_prob(Some(&stats), "M2", "M1"), None);
    }

    #[test]
    fn test_lookup_nested() {
        let table = HashMap::from([(
            "M1".to_string(),
            HashMap::from([("M2".to_string(), 0.4)]),
        )]);
        let stats = TransitionStats::from(table);

        assert_eq!(get_transition_prob(Some(&stats), "M1", "M2"), Some(0.4));
        assert_eq!(get_transition_prob(Some(&stats), "M1", "M3"), None);
        assert_eq!(get_transition_prob(Some(&stats), "M9", "M2"), None);
    }

    #[test]
    fn test_tuple_and_nested_json_agree() {
        let tuple = TransitionStats::from(HashMap::from([(pair("M1", "M2"), 0.7)]));
        let nested = TransitionStats::from(json!({"M1": {"M2": 0.7}}));

        assert_eq!(get_transition_prob(Some(&tuple), "M1", "M2"), Some(0.7));
        assert_eq!(get_transition_prob(Some(&nested), "M1", "M2"), Some(0.7));
    }

    #[test]
    fn test_lookup_flat_ngram_keys() {
        let stats = TransitionStats::from(json!({"M1|M2": 0.25}));
        assert_eq!(stats.lookup("M1", "M2"), Some(0.25));
    }

    #[test]
    fn test_lookup_full_payload_json() {
        let payload = compute_markov_stats(&[vec!["M1".to_string(), "M2".to_string()]]);
        let stats = TransitionStats::from(serde_json::to_value(&payload).unwrap());

        assert_eq!(stats.lookup("M1", "M2"), Some(1.0));
        assert_eq!(stats.lookup("M2", "M1"), None);
    }

    #[test]
    fn test_nested_preferred_over_flat() {
        let stats = TransitionStats::from(json!({"M1": {"M2": 0.9}, "M1|M2": 0.1}));
        assert_eq!(stats.lookup("M1", "M2"), Some(0.9));
    }

    #[test]
    fn test_lookup_from_payload() {
        let payload = compute_markov_stats(&[vec![
            "M1".to_string(),
            "M2".to_string(),
            "M1".to_string(),
            "M3".to_string(),
        ]]);
        let stats = TransitionStats::from(&payload);

        assert_eq!(stats.lookup("M1", "M2"), Some(0.5));
        assert_eq!(stats.lookup("M1", "M3"), Some(0.5));
        assert_eq!(stats.lookup("M3", "M1"), None);
    }

    #[test]
    fn test_payload_table_has_one_row_per_predecessor() {
        let payload = compute_markov_stats(&[
            vec!["M1".to_string(), "M2".to_string(), "M3".to_string()],
            vec!["M1".to_string(), "M3".to_string()],
        ]);

        let TransitionStats::Nested(table) = TransitionStats::from(&payload) else {
            panic!("payload converts to a nested table");
        };
        assert_eq!(table.len(), 2);
        assert_eq!(table["M1"].len(), 2);
        assert_eq!(table["M1"]["M2"], 0.5);
        assert_eq!(table["M2"]["M3"], 1.0);
        assert!(!table.contains_key("M3"));
    }

    #[test]
    fn test_mismatched_shapes_resolve_to_none() {
        for value in [
            json!(null),
            json!([["M1", "M2"]]),
            json!({"M1": "M2"}),
            json!({"M1": {"M2": "high"}}),
            json!({"M1": [0.5]}),
            json!({"transition_probs": 3}),
        ] {
            let stats = TransitionStats::from(value);
            assert_eq!(stats.lookup("M1", "M2"), None);
        }
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let stats = TransitionStats::from(HashMap::from([(pair("M1", "M2"), f64::NAN)]));
        assert_eq!(stats.lookup("M1", "M2"), None);
    }

    #[test]
    fn test_missing_table() {
        assert_eq!(get_transition_prob(None, "M1", "M2"), None);
    }
}
