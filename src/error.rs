use thiserror::Error;

/// Errors raised while building or stepping an environment
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A transition landed on a cell that is none of `S`, `F`, `H` or `G`
    ///
    /// Signals a malformed grid or a broken move offset, never recoverable
    #[error("transition landed on unrecognized cell kind {kind:?} at ({row}, {col})")]
    InvalidCellKind { kind: char, row: usize, col: usize },

    /// A transition left the grid
    #[error("transition left the grid at ({row}, {col})")]
    OutOfBounds { row: isize, col: isize },

    #[error("invalid grid: {message}")]
    InvalidGrid { message: String },

    #[error("invalid decay parameters: {message}")]
    InvalidDecay { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
