//! Signstat - sign-sequence statistics and per-sign transition context
//!
//! This library turns corpora of sign sequences (one per inscription) into
//! unigram, bigram, trigram, position and transition-probability tables, and
//! assembles per-occurrence transition evidence for a sign in a given
//! inscription for downstream scoring.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod render;
pub mod scoring;
pub mod seal;
pub mod sequence;
pub mod transition;

pub use context::{get_sign_context, Aggregation, AssembledContext, ContextAssembler};
pub use error::{SignstatError, ValidationError};
pub use sequence::{compute_markov_stats, normalize_sequences, StatsPayload};
pub use transition::{get_transition_prob, TransitionStats};
