use crate::error::{GenError, Result};
use serde::{Deserialize, Serialize};

/// the external context values a condition may compare against, in addition
/// to the declared function parameters
pub const DEFAULT_EXTERNAL_INPUTS: [&str; 3] = ["msg.value", "tx.gasprice", "block.number"];

pub const DEFAULT_OUTPUT: &str = "generated-maze.sol";

/// largest grid a stateful run may ask for
pub const MAX_CELLS: u64 = 1 << 20;

/// Which body builder drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// a single function holding one binary decision tree
    Stateless,
    /// a grid of cells, navigated by four movement functions
    Stateful,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Stateless => write!(f, "stateless"),
            Mode::Stateful => write!(f, "stateful"),
        }
    }
}

/// All parameters of one generation run. Built once and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub mode: Mode,
    pub seed: u64,
    pub num_params: usize,
    pub max_const: u64,
    pub min_depth: u32,
    pub max_depth: u32,
    pub dim_x: u32,
    pub dim_y: u32,
    /// probability of cutting a tree branch short (stateless mode only)
    pub return_probability: f64,
    pub external_inputs: Vec<String>,
}

impl GenerationConfig {
    pub fn new(mode: Mode) -> Self {
        match mode {
            Mode::Stateless => Self::stateless(),
            Mode::Stateful => Self::stateful(),
        }
    }

    pub fn stateless() -> Self {
        Self {
            mode: Mode::Stateless,
            seed: 0,
            num_params: 8,
            max_const: 64,
            min_depth: 0,
            max_depth: 8,
            dim_x: 1,
            dim_y: 1,
            return_probability: 0.1,
            external_inputs: DEFAULT_EXTERNAL_INPUTS.map(String::from).to_vec(),
        }
    }

    pub fn stateful() -> Self {
        Self {
            mode: Mode::Stateful,
            seed: 0,
            num_params: 8,
            max_const: 64,
            min_depth: 2,
            max_depth: 16,
            dim_x: 7,
            dim_y: 7,
            return_probability: 0.0,
            external_inputs: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_params(mut self, num_params: usize) -> Self {
        self.num_params = num_params;
        self
    }

    pub fn with_max_const(mut self, max_const: u64) -> Self {
        self.max_const = max_const;
        self
    }

    pub fn with_depth(mut self, min_depth: u32, max_depth: u32) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }

    pub fn with_dimensions(mut self, dim_x: u32, dim_y: u32) -> Self {
        self.dim_x = dim_x;
        self.dim_y = dim_y;
        self
    }

    pub fn with_return_probability(mut self, p: f64) -> Self {
        self.return_probability = p;
        self
    }

    pub fn with_external_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// `uint64 p0, uint64 p1, ...`
    pub fn params_decl(&self) -> String {
        (0..self.num_params)
            .map(|i| format!("uint64 p{i}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `p0, p1, ...`
    pub fn args_list(&self) -> String {
        (0..self.num_params)
            .map(|i| format!("p{i}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn cell_count(&self) -> u64 {
        self.dim_x as u64 * self.dim_y as u64
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_params == 0 && self.external_inputs.is_empty() {
            return Err(GenError::InvalidConfig(
                "conditions need at least one parameter or external input".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.return_probability) {
            return Err(GenError::InvalidConfig(format!(
                "return probability {} is outside [0, 1]",
                self.return_probability
            )));
        }
        if self.mode == Mode::Stateful {
            if self.dim_x == 0 || self.dim_y == 0 {
                return Err(GenError::InvalidConfig(format!(
                    "grid dimensions {}x{} must be non-zero",
                    self.dim_x, self.dim_y
                )));
            }
            if self.cell_count() > MAX_CELLS {
                return Err(GenError::InvalidConfig(format!(
                    "grid dimensions {}x{} exceed {MAX_CELLS} cells",
                    self.dim_x, self.dim_y
                )));
            }
            if self.min_depth > self.max_depth {
                return Err(GenError::InvalidConfig(format!(
                    "min depth {} exceeds max depth {}",
                    self.min_depth, self.max_depth
                )));
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::stateful()
    }
}
