// Matrix locator
// Finds named (job, matrix) pairs inside an arbitrary configuration document

use crate::error::{EngineError, EngineResult};
use crate::value::{Mapping, Value};

/// Synthetic name used when the document carries no job identifier.
pub const DEFAULT_JOB_NAME: &str = "Job";

/// A named matrix specification extracted from a document. The matrix is
/// kept as a raw value; the dimension resolver interprets it later.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDefinition {
    pub name: String,
    pub matrix: Value,
}

/// One document-shape rule: returns the jobs it recognizes, or `None`
/// when the shape does not apply (or applies but yields zero jobs).
type Extractor = fn(&Mapping) -> Option<Vec<JobDefinition>>;

/// Shape rules in precedence order; the first non-empty result wins.
/// The raw-matrix fallback always produces exactly one job.
const EXTRACTORS: &[Extractor] = &[
    jobs_block,
    job_dictionary,
    inline_strategy,
    inline_matrix,
    raw_matrix,
];

/// Locate every matrix specification in a parsed document.
///
/// Fails with `InvalidDocument` when the document is not a mapping.
pub fn extract_matrices(document: &Value) -> EngineResult<Vec<JobDefinition>> {
    let root = document.as_mapping().ok_or(EngineError::InvalidDocument)?;

    for extractor in EXTRACTORS {
        if let Some(jobs) = extractor(root) {
            return Ok(jobs);
        }
    }

    // Unreachable while raw_matrix is in the chain.
    Err(EngineError::NoMatrixFound)
}

/// Rule 1: full workflow with a `jobs` mapping.
fn jobs_block(root: &Mapping) -> Option<Vec<JobDefinition>> {
    let jobs = root.get("jobs")?.as_mapping()?;
    collect_jobs(jobs)
}

/// Rule 2: the document itself is a dictionary of jobs. Every top-level
/// value must be a mapping carrying at least one job-ish key; a plain
/// matrix has sequence values, so this avoids false positives.
fn job_dictionary(root: &Mapping) -> Option<Vec<JobDefinition>> {
    if root.is_empty() {
        return None;
    }

    let all_jobs = root.iter().all(|(_, value)| {
        value.as_mapping().is_some_and(|job| {
            job.contains_key("strategy")
                || job.contains_key("steps")
                || job.contains_key("runs-on")
        })
    });
    if !all_jobs {
        return None;
    }

    collect_jobs(root)
}

/// Rule 3: a single job body with `strategy.matrix`.
fn inline_strategy(root: &Mapping) -> Option<Vec<JobDefinition>> {
    let matrix = strategy_matrix(root)?;
    Some(vec![JobDefinition {
        name: DEFAULT_JOB_NAME.to_string(),
        matrix: matrix.clone(),
    }])
}

/// Rule 4: a bare `matrix` key.
fn inline_matrix(root: &Mapping) -> Option<Vec<JobDefinition>> {
    let matrix = root.get("matrix").filter(|v| !v.is_null())?;
    Some(vec![JobDefinition {
        name: DEFAULT_JOB_NAME.to_string(),
        matrix: matrix.clone(),
    }])
}

/// Rule 5: fallback, the whole document is the matrix specification.
fn raw_matrix(root: &Mapping) -> Option<Vec<JobDefinition>> {
    Some(vec![JobDefinition {
        name: DEFAULT_JOB_NAME.to_string(),
        matrix: Value::Mapping(root.clone()),
    }])
}

/// Per-entry extraction shared by rules 1 and 2: keep entries whose value
/// is a mapping with `strategy.matrix`, named by `name` or the entry key.
fn collect_jobs(entries: &Mapping) -> Option<Vec<JobDefinition>> {
    let mut results = Vec::new();

    for (job_id, value) in entries.iter() {
        let Some(job) = value.as_mapping() else {
            continue;
        };
        let Some(matrix) = strategy_matrix(job) else {
            continue;
        };

        let name = job
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(job_id)
            .to_string();

        results.push(JobDefinition {
            name,
            matrix: matrix.clone(),
        });
    }

    if results.is_empty() {
        None
    } else {
        Some(results)
    }
}

fn strategy_matrix(job: &Mapping) -> Option<&Value> {
    job.get("strategy")?
        .as_mapping()?
        .get("matrix")
        .filter(|v| !v.is_null())
}
