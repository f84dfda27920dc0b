use anyhow::{Context, Result};
use clap::Parser;
use signstat::cli::{Cli, Command, OutputFormat};
use signstat::config::Config;
use signstat::context::{Aggregation, ContextAssembler};
use signstat::render::render_evidence;
use signstat::seal::persist_seal_contexts;
use signstat::sequence::{compute_markov_stats, load_corpus, write_payload};
use signstat::transition::TransitionStats;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_stats(input: &Path, output: &Path) -> Result<()> {
    let corpus = load_corpus(input)
        .with_context(|| format!("Failed to load corpus: {}", input.display()))?;
    let payload = compute_markov_stats(&corpus);
    write_payload(output, &payload)
        .with_context(|| format!("Failed to write statistics: {}", output.display()))?;

    println!(
        "Wrote {} signs, {} bigrams, {} trigrams to {}",
        payload.unigrams.len(),
        payload.bigrams.len(),
        payload.trigrams.len(),
        output.display()
    );
    Ok(())
}

fn load_transition_stats(path: &Path) -> Result<TransitionStats> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transition table: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in transition table: {}", path.display()))?;
    Ok(TransitionStats::from(value))
}

#[allow(clippy::too_many_arguments)]
fn run_context(
    config: &Config,
    stats: Option<PathBuf>,
    sign: &str,
    sequence: &[String],
    aggregation: Option<String>,
    inscription: Option<String>,
    seal_contexts: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let transition_stats = stats.as_deref().map(load_transition_stats).transpose()?;

    let aggregation = aggregation
        .as_deref()
        .map(Aggregation::parse_lossy)
        .unwrap_or(config.context.aggregation);

    let assembler = match &inscription {
        Some(_) => {
            let path = seal_contexts.unwrap_or_else(|| config.paths.seal_contexts.clone());
            ContextAssembler::from_path(&path)
                .with_context(|| format!("Failed to load seal contexts: {}", path.display()))?
        }
        None => ContextAssembler::default(),
    };

    let ctx = assembler.get_sign_context(
        sign,
        inscription.as_deref(),
        Some(sequence),
        transition_stats.as_ref(),
        aggregation,
    );

    match format {
        OutputFormat::Text => println!("{}", render_evidence(&ctx)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx)?),
    }
    Ok(())
}

fn run_seal(input: &Path, output: &Path) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read seal analysis: {}", input.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in seal analysis: {}", input.display()))?;
    let Some(by_inscription) = raw.as_object() else {
        anyhow::bail!(
            "Seal analysis must be an object keyed by inscription id: {}",
            input.display()
        );
    };

    let contexts = persist_seal_contexts(by_inscription, output)
        .with_context(|| format!("Failed to write seal contexts: {}", output.display()))?;
    println!(
        "Wrote {} seal contexts to {}",
        contexts.len(),
        output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Stats { input, output } => run_stats(&input, &output),
        Command::Context {
            stats,
            sign,
            sequence,
            aggregation,
            inscription,
            seal_contexts,
            format,
        } => run_context(
            &config,
            stats,
            &sign,
            &sequence,
            aggregation,
            inscription,
            seal_contexts,
            format,
        ),
        Command::Seal { input, output } => run_seal(&input, &output),
    }
}
