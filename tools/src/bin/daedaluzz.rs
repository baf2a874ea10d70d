use anyhow::Result;
use clap::Parser;
use daedaluzz::config::DEFAULT_OUTPUT;
use daedaluzz::generate_to_file;
use daedaluzz_tools::{ConfigArgs, exit_code, init_logging};
use std::path::PathBuf;
use std::process::exit;

/// Generate a synthetic smart contract maze with uniquely numbered
/// assertion failures, for benchmarking fuzzers and symbolic executors
#[derive(Parser, Debug)]
#[command(name = "daedaluzz", author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Random seed. The same seed and options always give the same program
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Where to write the generated program
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Log every generated cell
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<()> {
    let cfg = args.config.to_config(args.seed);
    generate_to_file(&cfg, &args.output)?;
    Ok(())
}

pub fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    exit(exit_code(&mut std::io::stderr(), move || run(args)));
}
