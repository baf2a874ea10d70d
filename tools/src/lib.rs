use clap::Args;
use daedaluzz::{GenerationConfig, Mode};
use daedaluzz::config::DEFAULT_EXTERNAL_INPUTS;
use log::{LevelFilter, Record};
use std::io::Write;
use std::panic::{UnwindSafe, catch_unwind};

/// Shape of the generated program. Every option falls back to the default
/// of the selected mode.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Which body builder to use
    #[arg(long, value_enum, default_value_t = Mode::Stateful)]
    pub mode: Mode,

    /// Number of `uint64` parameters of every generated function
    #[arg(long)]
    pub params: Option<usize>,

    /// Upper bound (inclusive) of constants in conditions
    #[arg(long)]
    pub max_const: Option<u64>,

    /// Shortest chain of guards in front of a failure (stateful mode).
    /// Cells drawing a shorter chain become walls
    #[arg(long)]
    pub min_depth: Option<u32>,

    /// Maximum nesting of conditionals
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Number of maze columns (stateful mode)
    #[arg(long)]
    pub dim_x: Option<u32>,

    /// Number of maze rows (stateful mode)
    #[arg(long)]
    pub dim_y: Option<u32>,

    /// Probability of ending a tree branch early (stateless mode)
    #[arg(long)]
    pub return_probability: Option<f64>,

    /// Let conditions read msg.value, tx.gasprice and block.number. Always
    /// on in stateless mode
    #[arg(long)]
    pub external_inputs: bool,
}

impl ConfigArgs {
    pub fn to_config(&self, seed: u64) -> GenerationConfig {
        let mut cfg = GenerationConfig::new(self.mode).with_seed(seed);
        if let Some(n) = self.params {
            cfg = cfg.with_params(n);
        }
        if let Some(c) = self.max_const {
            cfg = cfg.with_max_const(c);
        }
        let min_depth = self.min_depth.unwrap_or(cfg.min_depth);
        let max_depth = self.max_depth.unwrap_or(cfg.max_depth);
        cfg = cfg.with_depth(min_depth, max_depth);
        let dim_x = self.dim_x.unwrap_or(cfg.dim_x);
        let dim_y = self.dim_y.unwrap_or(cfg.dim_y);
        cfg = cfg.with_dimensions(dim_x, dim_y);
        if let Some(p) = self.return_probability {
            cfg = cfg.with_return_probability(p);
        }
        if self.external_inputs {
            cfg = cfg.with_external_inputs(DEFAULT_EXTERNAL_INPUTS);
        }
        cfg
    }
}

/// Runs `run` and maps its outcome to the process exit status: 0 on success,
/// 1 on an error (reported on `err`), 2 on a panic. The panic message itself
/// comes from the default hook.
pub fn exit_code<W, F>(err: &mut W, run: F) -> i32
where
    W: Write,
    F: FnOnce() -> anyhow::Result<()> + UnwindSafe,
{
    match catch_unwind(run) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            let _ = writeln!(err, "terminated with error: {e}");
            1
        }
        Err(_) => 2,
    }
}

/// writes one log line as `[<level>] <message>`
pub fn format_record<W: Write>(buf: &mut W, record: &Record<'_>) -> std::io::Result<()> {
    writeln!(
        buf,
        "[{}] {}",
        record.level().as_str().to_ascii_lowercase(),
        record.args()
    )
}

/// `[<level>] <message>` lines on stderr. `RUST_LOG` still overrides the
/// level.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| format_record(buf, record))
        .init();
}
