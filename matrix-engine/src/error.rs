// Engine error types

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The parsed document is not a mapping, so no shape rule can apply.
    #[error("invalid input: document is not a mapping")]
    InvalidDocument,

    /// The locator produced zero usable jobs. The raw-matrix fallback
    /// normally prevents this; callers treat it as an input error.
    #[error("no matrix definitions found in input")]
    NoMatrixFound,

    /// Resource guard against combinatorial explosion, not part of the
    /// reference expansion behavior.
    #[error("matrix expands to {size} combinations, exceeding the limit of {limit}")]
    MatrixTooLarge { size: usize, limit: usize },
}
