use anyhow::Result;
use clap::Parser;
use cmv_corpus::{CorpusBuilder, DEFAULT_SEED};
use std::path::PathBuf;

/// Build a balanced delta / no-delta comment corpus from a CMV thread export.
#[derive(Parser, Debug)]
#[command(name = "cmv-corpus", version, about)]
struct Cli {
    /// Export file (JSONL, optionally .zst) or a directory of them.
    #[arg(short, long, default_value = "../data/reddit/cmv_20161111")]
    input: PathBuf,

    /// Directory receiving the CSV and JSON artifacts.
    #[arg(short, long, default_value = "../data/reddit")]
    out_dir: PathBuf,

    /// Artifact base name.
    #[arg(long, default_value = "reddit")]
    stem: String,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long)]
    no_progress: bool,

    /// Write single-line JSON instead of indented.
    #[arg(long)]
    compact_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let summary = CorpusBuilder::new()
        .input(&cli.input)
        .out_dir(&cli.out_dir)
        .stem(&cli.stem)
        .seed(cli.seed)
        .progress(!cli.no_progress)
        .pretty_json(!cli.compact_json)
        .run()?;

    println!(
        "Selected {} comments ({} OP deltas) from {} threads in {:.2}s",
        summary.selected,
        summary.positives,
        summary.forest.posts,
        summary.elapsed.as_secs_f64()
    );
    for p in summary.paths.all() {
        println!("  {}", p.display());
    }
    Ok(())
}
