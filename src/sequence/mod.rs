// N-gram and Positional Statistics for Sign Sequences
//
// Turns a corpus of sign sequences (one per inscription) into unigram,
// bigram, trigram and position counts plus first-order transition
// probabilities. Only empirical counts and one-step ratios are computed;
// interpretation is left to the context and scoring layers.
//
// Key format: n-grams are stored as "<sign_1>|<sign_2>[|<sign_3>]" strings
// in every emitted table (bigrams, trigrams, transition_probs).

mod ngram;
mod normalize;

pub use ngram::{
    compute_markov_stats, extract_ngrams, make_ngram_key, read_payload, split_bigram_key,
    write_payload, NGram, NGramMap, StatsPayload, NGRAM_DELIMITER,
};
pub use normalize::{load_corpus, normalize_sequences};

/// Opaque sign identifier
pub type Sign = String;

/// One observed inscription, in reading order
pub type Sequence = Vec<Sign>;

/// Ordered collection of sequences
pub type Corpus = Vec<Sequence>;
