//! Text rendering of assembled context for prompts and reports

use crate::context::AssembledContext;
use crate::seal::SealContext;

/// Renders a context as deterministic multi-line evidence text
///
/// Contexts without transition evidence (older payloads) fall back to the
/// scalar `follows_prob`.
///
/// # Example
/// ```
/// use signstat::context::{get_sign_context, Aggregation};
/// use signstat::render::render_evidence;
///
/// let seq = vec!["M1".to_string(), "M2".to_string()];
/// let text = render_evidence(&get_sign_context("M1", Some(&seq), None, Aggregation::Mean));
///
/// assert!(text.starts_with("Sign M1: mean transition probability n/a"));
/// assert!(text.contains("index 0: next M2 (p=n/a)"));
/// ```
pub fn render_evidence(ctx: &AssembledContext) -> String {
    let mut lines = Vec::new();

    match &ctx.transition_evidence {
        Some(evidence) => {
            lines.push(format!(
                "Sign {}: {} transition probability {}",
                ctx.sign,
                evidence.aggregation,
                format_prob(evidence.probability)
            ));
            for occurrence in &evidence.occurrences {
                lines.push(format!(
                    "  - index {}: next {} (p={})",
                    occurrence.index,
                    occurrence.next_sign.as_deref().unwrap_or("end"),
                    format_prob(occurrence.probability)
                ));
            }
        }
        None => lines.push(format!(
            "Sign {}: transition probability {}",
            ctx.sign,
            format_prob(ctx.follows_prob)
        )),
    }

    if let Some(note) = &ctx.note {
        lines.push(format!("Note: {}", note));
    }

    if let Some(seal) = ctx.seal_context.as_ref().filter(|s| !s.is_empty()) {
        lines.push(format!("Seal: {}", seal_summary(seal)));
    }

    lines.join("\n")
}

fn format_prob(prob: Option<f64>) -> String {
    match prob {
        Some(p) => format!("{:.3}", p),
        None => "n/a".to_string(),
    }
}

fn seal_summary(seal: &SealContext) -> String {
    let mut parts = Vec::new();

    if let Some(animal) = &seal.primary_animal {
        parts.push(format!("primary animal {}", animal));
    }
    if !seal.secondary_animals.is_empty() {
        parts.push(format!("secondary animals {}", seal.secondary_animals.join(", ")));
    }
    if let Some(water) = seal.water_motifs_present {
        parts.push(format!("water motifs {}", if water { "present" } else { "absent" }));
    }
    if !seal.astronomical_motifs.is_empty() {
        parts.push(format!(
            "astronomical motifs {}",
            seal.astronomical_motifs.join(", ")
        ));
    }
    if let Some(density) = seal.motif_density {
        parts.push(format!("motif density {:.2}", density));
    }
    if let Some(condition) = &seal.seal_condition {
        parts.push(format!("condition {}", condition));
    }
    if let Some(confidence) = seal.confidence {
        parts.push(format!("confidence {:.2}", confidence));
    }

    parts.join("; ")
}
