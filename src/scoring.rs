//! Heuristic hypothesis scoring against seal observations
//!
//! A hypothesis states what a sign's reading predicts about the seal it is
//! carved on. Each prediction that the seal confirms adds to the score, each
//! contradiction subtracts, and a missing observation contributes nothing.

use crate::context::AssembledContext;
use crate::seal::SealContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ANIMAL_MATCH: f64 = 1.0;
const ANIMAL_MISMATCH: f64 = -0.5;
const WATER_MATCH: f64 = 0.5;
const WATER_MISMATCH: f64 = -0.25;
const ASTRO_MATCH: f64 = 0.5;
const ASTRO_MISMATCH: f64 = -0.25;

/// Predictions a reading hypothesis makes about its seal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub expected_primary_animal: Option<String>,
    #[serde(default)]
    pub requires_water_motif: Option<bool>,
    #[serde(default)]
    pub expected_astronomical_motif: Option<String>,
}

impl Hypothesis {
    fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unknown>")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHypothesis {
    pub total_score: f64,
    pub components: BTreeMap<String, f64>,
    pub seal_context_used: Option<SealContext>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HypothesisScorer;

impl HypothesisScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score_hypothesis(
        &self,
        hypothesis: &Hypothesis,
        context: &AssembledContext,
    ) -> ScoredHypothesis {
        let seal = context.seal_context.as_ref();
        let seal_component = self.seal_score(hypothesis, seal);

        ScoredHypothesis {
            total_score: seal_component,
            components: BTreeMap::from([("seal".to_string(), seal_component)]),
            seal_context_used: seal.cloned(),
        }
    }

    /// Seal compatibility; neutral (0.0) when no seal context is available
    pub fn seal_score(&self, hypothesis: &Hypothesis, seal: Option<&SealContext>) -> f64 {
        // An id-only record still walks every component so each missing
        // observation gets its own neutral log line.
        let Some(seal) = seal else {
            tracing::info!("Neutral seal score: no seal context provided.");
            return 0.0;
        };

        let mut score = 0.0;

        if let Some(expected) = &hypothesis.expected_primary_animal {
            match &seal.primary_animal {
                None => tracing::info!(
                    "Neutral animal contribution for hypothesis {}: primary_animal missing.",
                    hypothesis.label()
                ),
                Some(observed) if observed == expected => score += ANIMAL_MATCH,
                Some(_) => score += ANIMAL_MISMATCH,
            }
        }

        if let Some(wants_water) = hypothesis.requires_water_motif {
            match seal.water_motifs_present {
                None => tracing::info!(
                    "Neutral water contribution for hypothesis {}: water_motifs_present missing.",
                    hypothesis.label()
                ),
                Some(water) if water == wants_water => score += WATER_MATCH,
                Some(_) => score += WATER_MISMATCH,
            }
        }

        if let Some(reference) = &hypothesis.expected_astronomical_motif {
            if seal.astronomical_motifs.is_empty() {
                tracing::info!(
                    "Neutral astronomy contribution for hypothesis {}: astronomical_motifs missing/empty.",
                    hypothesis.label()
                );
            } else if seal.astronomical_motifs.contains(reference) {
                score += ASTRO_MATCH;
            } else {
                score += ASTRO_MISMATCH;
            }
        }

        score
    }
}
