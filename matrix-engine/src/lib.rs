// Matrix Engine Library
// Locates build-matrix specifications in configuration documents and
// expands them into ordered job combinations

pub mod error;
pub mod expand;
pub mod extract;
pub mod report;
pub mod value;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};

pub use expand::{
    expand_document, Combination, JobResult, MatrixExpander, MatrixSpec, MAX_COMBINATIONS,
};

pub use extract::{extract_matrices, JobDefinition, DEFAULT_JOB_NAME};

pub use report::{underspecified_combinations, Underspecified};

pub use value::{Mapping, Number, Value};
