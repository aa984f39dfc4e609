mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::eyre;
use color_eyre::Result;

use matrix_engine::{expand_document, underspecified_combinations, JobResult, Value};

/// Expand CI build-matrix definitions into concrete job combinations
#[derive(Parser, Debug)]
#[command(name = "matrix-parser", version)]
struct Cli {
    /// Workflow or matrix files to expand (YAML or JSON)
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    output: OutputFormat,

    /// Validate only (no output unless an error is found)
    #[arg(long)]
    check: bool,

    /// Don't fail when jobs have underspecified combinations (only with --check)
    #[arg(long)]
    allow_underspecified: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let multiple = cli.inputs.len() > 1;
    let mut failed = false;

    // One input's failure must not abort the others; failures aggregate
    // into the final exit status.
    for path in &cli.inputs {
        if let Err(err) = process_input(path, &cli, multiple) {
            output::error(&format!("{}: {}", path.display(), err));
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn process_input(path: &Path, cli: &Cli, multiple: bool) -> Result<()> {
    let results = expand_file(path)?;

    if cli.check {
        let findings = validate_jobs(&results);
        if !findings.is_empty() && !cli.allow_underspecified {
            return Err(eyre!(findings.join("; ")));
        }
        output::check(&format!("{}: matrix definition is valid", path.display()));
        return Ok(());
    }

    // Not fatal outside --check, but worth surfacing on stderr.
    if !cli.allow_underspecified {
        for finding in validate_jobs(&results) {
            output::warning(&finding);
        }
    }

    match cli.output {
        OutputFormat::Yaml => {
            if multiple {
                println!("# {}", path.display());
            }
            print!("{}", output::render_yaml(&results)?);
        }
        OutputFormat::Json => {
            println!("{}", output::render_json(&results)?);
        }
    }

    Ok(())
}

/// Read, parse, and expand one input document.
fn expand_file(path: &Path) -> Result<Vec<JobResult>> {
    let content =
        fs::read_to_string(path).map_err(|err| eyre!("failed to read file: {}", err))?;

    let parsed: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|err| eyre!("failed to parse YAML: {}", err))?;

    let document = Value::from_yaml(&parsed);
    Ok(expand_document(&document)?)
}

/// Describe every underspecified combination, one line per job finding.
fn validate_jobs(results: &[JobResult]) -> Vec<String> {
    let mut findings = Vec::new();

    for job in results {
        let report = underspecified_combinations(&job.combinations);
        if report.is_empty() {
            continue;
        }

        let details: Vec<String> = report
            .iter()
            .map(|entry| {
                format!(
                    "combination {} is missing {}",
                    entry.index,
                    entry.missing_keys.join(", ")
                )
            })
            .collect();

        findings.push(format!(
            "job '{}' has {} underspecified combination(s): {}",
            job.name,
            report.len(),
            details.join("; ")
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_expand_file_round_trip() {
        let file = write_temp("os: [linux, windows]\nnode: [14, 16]\n");

        let results = expand_file(file.path()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].combinations.len(), 4);
    }

    #[test]
    fn test_expand_file_reports_missing_file() {
        let err = expand_file(Path::new("/nonexistent/matrix.yml")).unwrap_err();
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_expand_file_reports_yaml_syntax_errors() {
        let file = write_temp("os: [linux\n");

        let err = expand_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse YAML"));
    }

    #[test]
    fn test_expand_file_rejects_non_mapping_documents() {
        let file = write_temp("- a\n- b\n");

        let err = expand_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("not a mapping"));
    }

    #[test]
    fn test_validate_jobs_flags_partial_includes() {
        let file = write_temp(
            r#"
os: [linux]
include:
  - {os: mac}
  - {os: linux, node: 14}
"#,
        );

        // The appended mac combination never gains `node`.
        let results = expand_file(file.path()).unwrap();
        let findings = validate_jobs(&results);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("underspecified"));
        assert!(findings[0].contains("node"));
    }

    #[test]
    fn test_validate_jobs_accepts_uniform_matrices() {
        let file = write_temp("os: [linux, windows]\n");

        let results = expand_file(file.path()).unwrap();
        assert!(validate_jobs(&results).is_empty());
    }

    #[test]
    fn test_json_input_is_accepted() {
        // serde_yaml parses JSON documents too.
        let file = write_temp(r#"{"os": ["linux"], "node": [14]}"#);

        let results = expand_file(file.path()).unwrap();
        assert_eq!(results[0].combinations.len(), 1);
    }
}
