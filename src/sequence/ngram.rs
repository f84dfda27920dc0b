use crate::error::{Result, SignstatError};
use crate::sequence::Sign;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Delimiter joining signs into a canonical n-gram key (e.g. `"M1|M305"`)
///
/// Not escaped: a sign identifier containing `|` produces ambiguous keys.
pub const NGRAM_DELIMITER: char = '|';

/// Type alias for N-gram sequences (vector of sign identifiers)
pub type NGram = Vec<Sign>;

/// Type alias for N-gram frequency map
pub type NGramMap = HashMap<NGram, usize>;

/// Builds the canonical string key of an n-gram
///
/// ```
/// use signstat::sequence::make_ngram_key;
///
/// assert_eq!(make_ngram_key(&["M1", "M305", "M89"]), "M1|M305|M89");
/// ```
pub fn make_ngram_key<S: AsRef<str>>(signs: &[S]) -> String {
    let mut key = String::new();
    for (i, sign) in signs.iter().enumerate() {
        if i > 0 {
            key.push(NGRAM_DELIMITER);
        }
        key.push_str(sign.as_ref());
    }
    key
}

/// Splits a bigram key back into `(current, next)`
///
/// Splits at the first delimiter, so it only inverts [`make_ngram_key`] when
/// the current sign itself contains no delimiter.
pub fn split_bigram_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(NGRAM_DELIMITER)
}

/// Extracts N-gram sequences from a sign sequence
///
/// For example, with N=3 (trigrams):
/// - Input sequence: ["M1", "M305", "M89", "M2"]
/// - Output N-grams: [["M1", "M305", "M89"], ["M305", "M89", "M2"]]
///
/// # Example
/// ```
/// use signstat::sequence::extract_ngrams;
///
/// let signs = vec!["M1".to_string(), "M305".to_string(), "M89".to_string()];
/// let ngrams = extract_ngrams(&signs, 3);
///
/// assert_eq!(ngrams.len(), 1);
/// assert_eq!(ngrams.get(&signs), Some(&1));
/// ```
pub fn extract_ngrams(signs: &[Sign], n: usize) -> NGramMap {
    let mut ngrams: NGramMap = HashMap::new();
    count_ngrams_into(&mut ngrams, signs, n);
    ngrams
}

/// Adds every sliding window of size `n` in `signs` to an existing map
fn count_ngrams_into(ngrams: &mut NGramMap, signs: &[Sign], n: usize) {
    if n == 0 || signs.len() < n {
        return;
    }

    for window in signs.windows(n) {
        *ngrams.entry(window.to_vec()).or_insert(0) += 1;
    }
}

/// Unigram, bigram, trigram, transition and position tables for a corpus
///
/// Maps are ordered so equal statistics always serialize to identical JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    /// Sign -> occurrence count
    pub unigrams: BTreeMap<Sign, usize>,
    /// `"a|b"` -> count
    pub bigrams: BTreeMap<String, usize>,
    /// `"a|b|c"` -> count
    pub trigrams: BTreeMap<String, usize>,
    /// `"a|b"` -> bigram count / unigram count of `a`
    pub transition_probs: BTreeMap<String, f64>,
    /// Sign -> (position index -> count)
    pub position_counts: BTreeMap<Sign, BTreeMap<usize, usize>>,
}

impl StatsPayload {
    /// Transition row for `sign`: next sign -> probability
    pub fn successors(&self, sign: &str) -> BTreeMap<Sign, f64> {
        self.transition_probs
            .iter()
            .filter_map(|(key, &prob)| match split_bigram_key(key) {
                Some((current, next)) if current == sign => Some((next.to_string(), prob)),
                _ => None,
            })
            .collect()
    }

    /// Serializes the payload as pretty JSON
    ///
    /// # Errors
    /// Fails with [`SignstatError::NonFiniteProbability`] before any output is
    /// produced if a probability is NaN or infinite, since JSON cannot carry it.
    pub fn to_json_pretty(&self) -> Result<String> {
        if let Some((key, _)) = self.transition_probs.iter().find(|(_, p)| !p.is_finite()) {
            return Err(SignstatError::NonFiniteProbability { key: key.clone() });
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Computes Markov-style statistics over a normalized corpus
///
/// Empty sequences are skipped. Every non-final occurrence of a sign
/// contributes exactly one outgoing bigram, and the transition probability
/// of `a|b` is the bigram count over the unigram count of `a`.
///
/// # Example
/// ```
/// use signstat::sequence::compute_markov_stats;
///
/// let corpus = vec![vec!["M1".to_string(), "M305".to_string(), "M89".to_string()]];
/// let stats = compute_markov_stats(&corpus);
///
/// assert_eq!(stats.bigrams.get("M1|M305"), Some(&1));
/// assert_eq!(stats.transition_probs.get("M305|M89"), Some(&1.0));
/// ```
pub fn compute_markov_stats(sequences: &[Vec<Sign>]) -> StatsPayload {
    let mut unigram_counts: HashMap<&str, usize> = HashMap::new();
    let mut position_counts: HashMap<&str, HashMap<usize, usize>> = HashMap::new();
    let mut bigram_counts: NGramMap = HashMap::new();
    let mut trigram_counts: NGramMap = HashMap::new();

    for seq in sequences.iter().filter(|seq| !seq.is_empty()) {
        for (position, sign) in seq.iter().enumerate() {
            *unigram_counts.entry(sign).or_insert(0) += 1;
            *position_counts
                .entry(sign)
                .or_default()
                .entry(position)
                .or_insert(0) += 1;
        }

        count_ngrams_into(&mut bigram_counts, seq, 2);
        count_ngrams_into(&mut trigram_counts, seq, 3);
    }

    let transition_probs = bigram_counts
        .iter()
        .map(|(pair, &count)| {
            let denom = unigram_counts.get(pair[0].as_str()).copied().unwrap_or(0);
            let prob = if denom > 0 {
                count as f64 / denom as f64
            } else {
                0.0
            };
            (make_ngram_key(pair), prob)
        })
        .collect();

    let payload = StatsPayload {
        unigrams: unigram_counts
            .into_iter()
            .map(|(sign, count)| (sign.to_string(), count))
            .collect(),
        bigrams: keyed(bigram_counts),
        trigrams: keyed(trigram_counts),
        transition_probs,
        position_counts: position_counts
            .into_iter()
            .map(|(sign, positions)| (sign.to_string(), positions.into_iter().collect()))
            .collect(),
    };

    tracing::debug!(
        "Computed statistics: {} signs, {} bigrams, {} trigrams",
        payload.unigrams.len(),
        payload.bigrams.len(),
        payload.trigrams.len()
    );

    payload
}

fn keyed(ngrams: NGramMap) -> BTreeMap<String, usize> {
    ngrams
        .into_iter()
        .map(|(ngram, count)| (make_ngram_key(&ngram), count))
        .collect()
}

/// Writes a payload as JSON, creating parent directories as needed
///
/// The whole document is serialized in memory first, so a payload that
/// cannot be represented never leaves a partial file behind.
pub fn write_payload<P: AsRef<Path>>(path: P, payload: &StatsPayload) -> Result<()> {
    let json = payload.to_json_pretty()?;

    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path.as_ref(), json + "\n")?;

    tracing::info!("Wrote statistics payload to {}", path.as_ref().display());
    Ok(())
}

/// Reads a payload previously written by [`write_payload`]
pub fn read_payload<P: AsRef<Path>>(path: P) -> Result<StatsPayload> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}
