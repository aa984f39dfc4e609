// Output formatting helpers for the CLI

use color_eyre::Result;

use matrix_engine::{JobResult, Value, DEFAULT_JOB_NAME};

/// Print an error message
pub fn error(message: &str) {
    eprintln!("\x1b[1;31merror:\x1b[0m {}", message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("\x1b[33mwarning:\x1b[0m {}", message);
}

/// Print a check/pass item
pub fn check(message: &str) {
    eprintln!("\x1b[32m  \u{2713}\x1b[0m {}", message);
}

/// Serialize job results as YAML.
pub fn render_yaml(results: &[JobResult]) -> Result<String> {
    Ok(serde_yaml::to_string(&output_value(results))?)
}

/// Serialize job results as pretty-printed JSON.
pub fn render_json(results: &[JobResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&output_value(results))?)
}

/// A single job with the synthetic placeholder name serializes as a bare
/// combination list; anything else becomes a job-name keyed mapping.
fn output_value(results: &[JobResult]) -> Value {
    if results.len() == 1 && results[0].name == DEFAULT_JOB_NAME {
        combination_list(&results[0])
    } else {
        Value::Mapping(
            results
                .iter()
                .map(|job| (job.name.clone(), combination_list(job)))
                .collect(),
        )
    }
}

fn combination_list(job: &JobResult) -> Value {
    Value::Sequence(
        job.combinations
            .iter()
            .cloned()
            .map(Value::Mapping)
            .collect(),
    )
}
