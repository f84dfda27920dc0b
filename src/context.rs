//! Per-sign context assembly
//!
//! For a target sign and one inscription, every occurrence of the sign is
//! located, the sign that follows each occurrence is resolved against a
//! transition table, and the available probabilities are folded into one
//! score-ready value. Absent sequences, absent tables and unresolvable pairs
//! all produce a well-formed context carrying `None`s; nothing here fails.

use crate::error::Result;
use crate::seal::{load_seal_contexts, SealContext, SealContextMap};
use crate::sequence::Sign;
use crate::transition::{get_transition_prob, TransitionStats};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Note attached when there is nothing to scan
pub const NO_SEQUENCE_NOTE: &str = "No sequence data supplied; transition evidence unavailable.";

/// How per-occurrence probabilities are folded into one value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Aggregation {
    #[default]
    Mean,
    Max,
}

impl Aggregation {
    /// Parses a method name; anything other than `"max"` means `Mean`
    pub fn parse_lossy(method: &str) -> Self {
        match method.trim().to_ascii_lowercase().as_str() {
            "max" => Aggregation::Max,
            "mean" => Aggregation::Mean,
            other => {
                tracing::warn!("Unknown aggregation '{}', falling back to mean", other);
                Aggregation::Mean
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Max => "max",
        }
    }

    /// Folds the probabilities; `None` when the slice is empty
    pub fn aggregate(&self, probabilities: &[f64]) -> Option<f64> {
        if probabilities.is_empty() {
            return None;
        }
        match self {
            Aggregation::Max => probabilities.iter().copied().reduce(f64::max),
            Aggregation::Mean => {
                Some(probabilities.iter().sum::<f64>() / probabilities.len() as f64)
            }
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Aggregation {
    fn from(method: String) -> Self {
        Aggregation::parse_lossy(&method)
    }
}

impl From<Aggregation> for String {
    fn from(method: Aggregation) -> Self {
        method.as_str().to_string()
    }
}

/// Transition evidence for one occurrence of the target sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceEvidence {
    pub index: usize,
    /// `None` when the occurrence ends the sequence
    pub next_sign: Option<Sign>,
    /// `None` when there is no successor or the table has no entry
    pub probability: Option<f64>,
}

/// Evidence for every occurrence of a sign in one sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvidence {
    pub aggregation: Aggregation,
    pub probability: Option<f64>,
    pub available_probability_count: usize,
    pub occurrences: Vec<OccurrenceEvidence>,
}

/// Legacy `follows` field: a scalar for one occurrence, a list for several
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Follows {
    Single(Option<Sign>),
    Many(Vec<Option<Sign>>),
}

/// Context handed to renderers and scorers for one sign in one inscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub sign: Sign,
    #[serde(default)]
    pub sequence: Vec<Sign>,
    #[serde(default)]
    pub occurrence_indices: Vec<usize>,
    #[serde(default)]
    pub follows: Option<Follows>,
    /// Aggregate over all occurrences, not a single-transition probability
    #[serde(default)]
    pub follows_prob: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_evidence: Option<TransitionEvidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal_context: Option<SealContext>,
}

/// Assembles transition context for `sign` within `sequence`
///
/// # Example
/// ```
/// use signstat::context::{get_sign_context, Aggregation, Follows};
/// use signstat::transition::TransitionStats;
///
/// let seq: Vec<String> = ["M1", "M2", "M1"].iter().map(|s| s.to_string()).collect();
/// let stats = TransitionStats::from(serde_json::json!({"M1": {"M2": 0.4}}));
///
/// let ctx = get_sign_context("M1", Some(&seq), Some(&stats), Aggregation::Mean);
///
/// assert_eq!(ctx.occurrence_indices, vec![0, 2]);
/// assert_eq!(ctx.follows, Some(Follows::Many(vec![Some("M2".to_string()), None])));
/// assert_eq!(ctx.follows_prob, Some(0.4));
/// ```
pub fn get_sign_context(
    sign: &str,
    sequence: Option<&[Sign]>,
    transition_stats: Option<&TransitionStats>,
    aggregation: Aggregation,
) -> AssembledContext {
    let sequence = match sequence {
        Some(seq) if !seq.is_empty() => seq,
        _ => {
            return AssembledContext {
                sign: sign.to_string(),
                sequence: Vec::new(),
                occurrence_indices: Vec::new(),
                follows: None,
                follows_prob: None,
                transition_evidence: Some(TransitionEvidence {
                    aggregation,
                    probability: None,
                    available_probability_count: 0,
                    occurrences: Vec::new(),
                }),
                note: Some(NO_SEQUENCE_NOTE.to_string()),
                seal_context: None,
            }
        }
    };

    let occurrences: Vec<OccurrenceEvidence> = sequence
        .iter()
        .enumerate()
        .filter(|(_, token)| token.as_str() == sign)
        .map(|(index, _)| {
            let next_sign = sequence.get(index + 1).cloned();
            let probability = next_sign
                .as_deref()
                .and_then(|next| get_transition_prob(transition_stats, sign, next));
            OccurrenceEvidence {
                index,
                next_sign,
                probability,
            }
        })
        .collect();

    let available: Vec<f64> = occurrences.iter().filter_map(|o| o.probability).collect();
    let probability = aggregation.aggregate(&available);

    let follows = match occurrences.as_slice() {
        [] => None,
        [only] => Some(Follows::Single(only.next_sign.clone())),
        many => Some(Follows::Many(
            many.iter().map(|o| o.next_sign.clone()).collect(),
        )),
    };

    tracing::debug!(
        "Sign {}: {} occurrences, {} with transition data",
        sign,
        occurrences.len(),
        available.len()
    );

    AssembledContext {
        sign: sign.to_string(),
        sequence: sequence.to_vec(),
        occurrence_indices: occurrences.iter().map(|o| o.index).collect(),
        follows,
        follows_prob: probability,
        transition_evidence: Some(TransitionEvidence {
            aggregation,
            probability,
            available_probability_count: available.len(),
            occurrences,
        }),
        note: None,
        seal_context: None,
    }
}

/// Joins sequence evidence with seal observations for an inscription
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    seal_contexts: SealContextMap,
}

impl ContextAssembler {
    pub fn new(seal_contexts: SealContextMap) -> Self {
        Self { seal_contexts }
    }

    /// Loads seal contexts from disk; a missing file yields no seal data
    pub fn from_path<P: AsRef<Path>>(seal_context_path: P) -> Result<Self> {
        Ok(Self::new(load_seal_contexts(seal_context_path)?))
    }

    pub fn seal_context(&self, inscription_id: &str) -> Option<&SealContext> {
        self.seal_contexts.get(inscription_id)
    }

    /// Like [`get_sign_context`], with the inscription's seal record attached
    ///
    /// An unknown inscription still gets a seal context carrying only its id.
    /// An empty id attaches nothing.
    pub fn get_sign_context(
        &self,
        sign: &str,
        inscription_id: Option<&str>,
        sequence: Option<&[Sign]>,
        transition_stats: Option<&TransitionStats>,
        aggregation: Aggregation,
    ) -> AssembledContext {
        let mut ctx = get_sign_context(sign, sequence, transition_stats, aggregation);

        if let Some(id) = inscription_id.filter(|id| !id.is_empty()) {
            let mut seal = self.seal_context(id).cloned().unwrap_or_default();
            seal.inscription_id.get_or_insert_with(|| id.to_string());
            ctx.seal_context = Some(seal);
        }
        ctx
    }
}
