//! Command-line harness for the wordhint suggestion engine.
//!
//! Wires a vocabulary-file tokenizer and a scripted runtime into the engine
//! so the decoding and sampling pipeline can be exercised end to end without
//! a real model. Reads editor text line by line from stdin and prints the
//! sampled suggestions for each line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wh_engine::{EngineConfig, PromptTemplate, SuggestionEngine, VocabTokenizer};
use wh_runtime::{CacheRotationMap, ScriptedRuntime, SlotId, SlotRegistry};

#[derive(Parser, Debug)]
#[command(name = "wordhint", about = "Next-word suggestion engine harness")]
struct Args {
    /// Newline-delimited vocabulary file; line number is token id.
    #[arg(long)]
    vocab: PathBuf,

    /// Beginning-of-sequence token id within the vocabulary.
    #[arg(long, default_value_t = 2)]
    bos_id: u32,

    /// Number of suggestions per request.
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Sampling temperature; must be positive.
    #[arg(long, default_value_t = 1.0)]
    temperature: f32,

    /// Context window of the simulated model.
    #[arg(long, default_value_t = 2048)]
    context_window: usize,

    /// How many top-scoring tokens enter the sampling pool.
    #[arg(long, default_value_t = 200)]
    candidate_pool: usize,

    /// Seed for both the simulated logits and the sampler.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Instruction line for the user turn of the prompt template.
    #[arg(long, default_value = "Write a poem.")]
    instruction: String,
}

/// A scripted stand-in for a real model: one fixed seeded logits frame over
/// the vocabulary, replayed for every forward pass, with a pair of small
/// cache tensors so rotation still runs.
fn build_runtime(vocab_size: usize, context_window: usize, seed: u64) -> ScriptedRuntime {
    let mut rng = StdRng::seed_from_u64(seed);
    let frame: Vec<f32> = (0..vocab_size).map(|_| rng.gen_range(0.0..8.0)).collect();

    ScriptedRuntime::builder()
        .inputs(&[1, 1, context_window, 16, 16])
        .outputs(&[vocab_size, 16, 16])
        .logits(SlotId(0), vec![frame])
        .repeat_last(true)
        .build()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let tokenizer = VocabTokenizer::from_file(&args.vocab, args.bos_id)
        .with_context(|| format!("loading vocabulary from {}", args.vocab.display()))?;
    let vocab_size = tokenizer.vocab_size();
    info!(vocab_size, "tokenizer ready");

    let runtime = build_runtime(vocab_size, args.context_window, args.seed);
    let rotation = CacheRotationMap::from_indices(&[(3, 1), (4, 2)]);
    let slots = SlotRegistry::new(0, 1, 2, 0, rotation);

    let mut engine = SuggestionEngine::new(
        Box::new(runtime),
        Box::new(tokenizer),
        slots,
        PromptTemplate::with_instruction(args.instruction.clone()),
        EngineConfig {
            context_window: args.context_window,
            candidate_pool: args.candidate_pool,
            seed: Some(args.seed),
        },
    )
    .context("composing suggestion engine")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let text = line.context("reading stdin")?;
        let words = engine
            .predict_next_words(&text, args.top_k, args.temperature)
            .context("predicting next words")?;
        if words.is_empty() {
            writeln!(stdout, "(no suggestions)")?;
        } else {
            writeln!(stdout, "{}", words.join(" | "))?;
        }
    }

    Ok(())
}
