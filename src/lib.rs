/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Transition and episode records
pub mod memory;

/// Testing environments
pub mod gym;

mod util;

pub use error::{Error, Result};
