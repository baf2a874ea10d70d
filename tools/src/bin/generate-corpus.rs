use anyhow::{Context, Result};
use clap::Parser;
use daedaluzz::generate;
use daedaluzz_tools::{ConfigArgs, init_logging};
use log::info;
use std::fs::create_dir_all;
use std::path::PathBuf;

/// Generate one program per seed into a directory, as a benchmark corpus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// First seed of the range
    #[arg(long, default_value_t = 0)]
    first_seed: u64,

    /// Number of programs (and seeds) to generate
    #[arg(short, long, default_value_t = 100)]
    count: u64,

    /// Output directory. Files are named `<mode>-<seed>.sol`
    #[arg(long, default_value = "corpus")]
    out_dir: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

pub fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut leaves = 0_u64;
    for seed in args.first_seed..args.first_seed.saturating_add(args.count) {
        let cfg = args.config.to_config(seed);
        let artifact = generate(&cfg)?;
        leaves += artifact.leaf_count() as u64;
        artifact.write_to(args.out_dir.join(format!("{}-{seed}.sol", cfg.mode)))?;
    }
    info!(
        "{} programs, {leaves} failure markers in total, written to {}",
        args.count,
        args.out_dir.display()
    );
    Ok(())
}
