//! Canonical seal-context records
//!
//! Vision output describing the motifs on a seal arrives with inconsistent
//! field names and types. Each record is normalized once, at ingestion, into
//! a [`SealContext`] starting from its `Default` template. Synonym field
//! names do not survive past this module.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default on-disk location of persisted seal contexts
pub const DEFAULT_SEAL_CONTEXT_PATH: &str = "data/ivs/features/seal_contexts.json";

/// Ordered `(synonym, canonical)` field names accepted from vision producers
///
/// The canonical name always wins when both are present.
pub const SEAL_FIELD_SYNONYMS: &[(&str, &str)] = &[
    ("has_water", "water_motifs_present"),
    ("celestial_symbols", "astronomical_motifs"),
    ("dominant_animal", "primary_animal"),
];

/// Motif observations for one inscribed seal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SealContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inscription_id: Option<String>,
    #[serde(default)]
    pub water_motifs_present: Option<bool>,
    #[serde(default)]
    pub astronomical_motifs: Vec<String>,
    #[serde(default)]
    pub primary_animal: Option<String>,
    #[serde(default)]
    pub secondary_animals: Vec<String>,
    #[serde(default)]
    pub motif_density: Option<f64>,
    #[serde(default)]
    pub seal_condition: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl SealContext {
    /// True when no motif field carries an observation
    pub fn is_empty(&self) -> bool {
        let observed = SealContext {
            inscription_id: None,
            ..self.clone()
        };
        observed == SealContext::default()
    }
}

/// Seal contexts keyed by inscription identifier
pub type SealContextMap = BTreeMap<String, SealContext>;

/// Converts one raw vision analysis into the canonical seal-context shape
///
/// Fields with an unexpected JSON type are dropped (left at their default)
/// rather than failing the whole record.
///
/// # Example
/// ```
/// use signstat::seal::normalize_seal_analysis;
///
/// let raw = serde_json::json!({"has_water": false, "dominant_animal": "zebu"});
/// let ctx = normalize_seal_analysis("M-101", &raw);
///
/// assert_eq!(ctx.water_motifs_present, Some(false));
/// assert_eq!(ctx.primary_animal.as_deref(), Some("zebu"));
/// assert_eq!(ctx.inscription_id.as_deref(), Some("M-101"));
/// ```
pub fn normalize_seal_analysis(inscription_id: &str, analysis: &Value) -> SealContext {
    let fields = canonical_fields(analysis);

    SealContext {
        inscription_id: Some(inscription_id.to_string()),
        water_motifs_present: field(&fields, "water_motifs_present", Value::as_bool),
        astronomical_motifs: string_list(&fields, "astronomical_motifs"),
        primary_animal: field(&fields, "primary_animal", as_string),
        secondary_animals: string_list(&fields, "secondary_animals"),
        motif_density: field(&fields, "motif_density", Value::as_f64),
        seal_condition: field(&fields, "seal_condition", as_string),
        confidence: field(&fields, "confidence", Value::as_f64),
    }
}

/// Applies [`SEAL_FIELD_SYNONYMS`], dropping null values
fn canonical_fields(analysis: &Value) -> Map<String, Value> {
    let mut fields: Map<String, Value> = analysis
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();

    for (synonym, canonical) in SEAL_FIELD_SYNONYMS {
        if let Some(value) = fields.remove(*synonym) {
            if !fields.contains_key(*canonical) {
                fields.insert((*canonical).to_string(), value);
            }
        }
    }
    fields
}

fn field<T>(fields: &Map<String, Value>, name: &str, convert: fn(&Value) -> Option<T>) -> Option<T> {
    let value = fields.get(name)?;
    let converted = convert(value);
    if converted.is_none() {
        tracing::debug!("Dropping seal field '{}' with unexpected value {}", name, value);
    }
    converted
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn string_list(fields: &Map<String, Value>, name: &str) -> Vec<String> {
    match fields.get(name) {
        Some(Value::Array(items)) => items.iter().filter_map(as_string).collect(),
        Some(Value::String(single)) => vec![single.clone()],
        Some(other) => {
            tracing::debug!("Dropping seal field '{}' with unexpected value {}", name, other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Normalizes every raw analysis and persists the result as sorted JSON
pub fn persist_seal_contexts<P: AsRef<Path>>(
    raw_analysis_by_inscription: &Map<String, Value>,
    output_path: P,
) -> Result<SealContextMap> {
    let contexts: SealContextMap = raw_analysis_by_inscription
        .iter()
        .map(|(id, analysis)| (id.clone(), normalize_seal_analysis(id, analysis)))
        .collect();

    let json = serde_json::to_string_pretty(&contexts)?;
    if let Some(parent) = output_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output_path.as_ref(), json + "\n")?;

    tracing::info!(
        "Persisted {} seal contexts to {}",
        contexts.len(),
        output_path.as_ref().display()
    );
    Ok(contexts)
}

/// Reads persisted seal contexts; an absent file yields an empty map
pub fn load_seal_contexts<P: AsRef<Path>>(path: P) -> Result<SealContextMap> {
    if !path.as_ref().exists() {
        tracing::debug!("No seal contexts at {}", path.as_ref().display());
        return Ok(SealContextMap::new());
    }
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}
