use crate::error::{json_kind, Result, ValidationError};
use crate::sequence::{Corpus, Sign};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Normalizes a corpus JSON value into ordered lists of sign tokens
///
/// Accepted shapes:
/// - `[["M1", "M305", ...], ...]`
/// - `{"sequences": [[...], ...]}`
///
/// Every token is coerced to a string: numbers keep their JSON text, booleans
/// and null use the `True`/`False`/`None` spelling of the existing corpus
/// tooling, and nested arrays or objects become their compact JSON text.
/// Corpus order and within-sequence order are preserved exactly.
///
/// # Example
/// ```
/// use signstat::sequence::normalize_sequences;
///
/// let raw = serde_json::json!({"sequences": [["M1", 305, true]]});
/// let corpus = normalize_sequences(&raw).unwrap();
///
/// assert_eq!(corpus, vec![vec!["M1".to_string(), "305".to_string(), "True".to_string()]]);
/// ```
pub fn normalize_sequences(raw: &Value) -> std::result::Result<Corpus, ValidationError> {
    let sequences = match raw {
        Value::Object(map) => map.get("sequences"),
        other => Some(other),
    };

    let sequences = match sequences {
        Some(Value::Array(sequences)) => sequences,
        Some(other) => {
            return Err(ValidationError::InvalidShape {
                found: json_kind(other),
            })
        }
        None => {
            return Err(ValidationError::InvalidShape {
                found: "object without `sequences`",
            })
        }
    };

    sequences
        .iter()
        .enumerate()
        .map(|(index, seq)| {
            let Value::Array(tokens) = seq else {
                return Err(ValidationError::NotASequence {
                    index,
                    found: json_kind(seq),
                });
            };
            Ok(tokens.iter().map(coerce_token).collect::<Vec<Sign>>())
        })
        .collect()
}

/// Reads a corpus JSON file and normalizes it
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let content = fs::read_to_string(path.as_ref())?;
    let raw: Value = serde_json::from_str(&content)?;
    let corpus = normalize_sequences(&raw)?;

    tracing::debug!(
        "Loaded {} sequences from {}",
        corpus.len(),
        path.as_ref().display()
    );
    Ok(corpus)
}

fn coerce_token(token: &Value) -> Sign {
    match token {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Array(_) | Value::Object(_) => token.to_string(),
    }
}
