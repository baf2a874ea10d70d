pub mod condition;
pub mod config;
pub mod context;
pub mod emitter;
pub mod error;
pub mod maze;
pub mod rng;
pub mod tree;

pub use config::{GenerationConfig, Mode};
pub use emitter::{ProgramArtifact, generate, generate_to_file};
pub use error::{GenError, Result};

#[cfg(test)]
mod tests;
