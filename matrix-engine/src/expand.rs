// Matrix expansion
// Cartesian product of dimensions, exclude filtering, include merging

use crate::error::{EngineError, EngineResult};
use crate::extract::{extract_matrices, JobDefinition};
use crate::value::{Mapping, Value};

/// Upper bound on the number of generated combinations. Purely a resource
/// guard; reference behavior imposes no limit.
pub const MAX_COMBINATIONS: usize = 65_536;

/// One expanded job configuration: dimension names mapped to chosen
/// values, possibly extended or overwritten by include rules.
pub type Combination = Mapping;

/// A matrix specification split into its three parts, each in declaration
/// order. Reserved keys `include`/`exclude` are never dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixSpec {
    pub dimensions: Vec<(String, Vec<Value>)>,
    pub include: Vec<Mapping>,
    pub exclude: Vec<Mapping>,
}

impl MatrixSpec {
    /// Split a raw matrix value into dimensions and rules.
    ///
    /// Returns `None` when the value is not a mapping (such a matrix
    /// expands to zero combinations). Non-sequence dimension candidates
    /// are ignored, and rule entries that are not mappings are skipped.
    pub fn from_value(matrix: &Value) -> Option<MatrixSpec> {
        let map = matrix.as_mapping()?;

        let mut spec = MatrixSpec::default();
        for (key, value) in map.iter() {
            match key {
                "include" => spec.include = rule_list(value),
                "exclude" => spec.exclude = rule_list(value),
                _ => {
                    if let Some(values) = value.as_sequence() {
                        spec.dimensions.push((key.to_string(), values.to_vec()));
                    }
                }
            }
        }

        Some(spec)
    }

    fn dimension_keys(&self) -> Vec<&str> {
        self.dimensions.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Read `include`/`exclude` as a sequence of mappings. Any other shape
/// counts as absent; non-mapping entries are malformed rules and skipped.
fn rule_list(value: &Value) -> Vec<Mapping> {
    value
        .as_sequence()
        .unwrap_or(&[])
        .iter()
        .filter_map(|entry| entry.as_mapping().cloned())
        .collect()
}

/// Expands matrix specifications into combination lists.
pub struct MatrixExpander;

impl MatrixExpander {
    /// Expand a raw matrix value. Non-mapping values yield no
    /// combinations.
    pub fn expand(matrix: &Value) -> EngineResult<Vec<Combination>> {
        match MatrixSpec::from_value(matrix) {
            Some(spec) => Self::expand_spec(&spec),
            None => Ok(Vec::new()),
        }
    }

    /// Expand a resolved specification: product, then excludes, then
    /// includes.
    pub fn expand_spec(spec: &MatrixSpec) -> EngineResult<Vec<Combination>> {
        // With no dimensions the product is a single empty seed, so
        // includes can still populate the job.
        let mut combinations = if spec.dimensions.is_empty() {
            vec![Mapping::new()]
        } else {
            Self::cartesian_product(&spec.dimensions)?
        };

        combinations.retain(|combo| !spec.exclude.iter().any(|rule| exclude_matches(combo, rule)));

        let dimension_keys = spec.dimension_keys();

        // The working sequence is merged in place so later rules observe
        // earlier merges; appended rules live apart and are never match
        // candidates themselves.
        let mut appended: Vec<Combination> = Vec::new();
        for rule in &spec.include {
            let mut matched = false;
            for combo in combinations.iter_mut() {
                if include_matches(combo, rule, &dimension_keys) {
                    combo.merge_from(rule);
                    matched = true;
                }
            }
            if !matched {
                appended.push(rule.clone());
            }
        }
        combinations.extend(appended);

        Ok(combinations)
    }

    /// Full cartesian product in declaration order: the first-declared
    /// dimension is the outermost loop, values run in declared order.
    fn cartesian_product(dimensions: &[(String, Vec<Value>)]) -> EngineResult<Vec<Combination>> {
        let size = dimensions
            .iter()
            .fold(1usize, |acc, (_, values)| acc.saturating_mul(values.len()));
        if size > MAX_COMBINATIONS {
            return Err(EngineError::MatrixTooLarge {
                size,
                limit: MAX_COMBINATIONS,
            });
        }

        let mut results = Vec::with_capacity(size);
        let mut current = Mapping::new();
        product_step(dimensions, &mut current, &mut results);
        Ok(results)
    }
}

fn product_step(
    dimensions: &[(String, Vec<Value>)],
    current: &mut Mapping,
    results: &mut Vec<Combination>,
) {
    match dimensions.split_first() {
        None => results.push(current.clone()),
        Some(((key, values), rest)) => {
            for value in values {
                current.insert(key.clone(), value.clone());
                product_step(rest, current, results);
            }
        }
    }
}

/// An exclude rule matches iff every rule key exists in the combination
/// with a structurally equal value. A key the combination lacks forces a
/// non-match.
fn exclude_matches(combination: &Combination, rule: &Mapping) -> bool {
    rule.iter().all(|(key, value)| {
        combination
            .get(key)
            .is_some_and(|existing| existing == value)
    })
}

/// An include rule matches on dimension keys only: every dimension key
/// the rule carries must be structurally equal in the combination.
/// Non-dimension rule keys are payload, never match criteria.
fn include_matches(combination: &Combination, rule: &Mapping, dimension_keys: &[&str]) -> bool {
    dimension_keys.iter().all(|key| match rule.get(key) {
        Some(value) => combination
            .get(key)
            .is_some_and(|existing| existing == value),
        None => true,
    })
}

/// Locate and expand every matrix in a document, preserving job order.
pub fn expand_document(document: &Value) -> EngineResult<Vec<JobResult>> {
    let definitions = extract_matrices(document)?;
    if definitions.is_empty() {
        return Err(EngineError::NoMatrixFound);
    }

    definitions
        .iter()
        .map(|JobDefinition { name, matrix }| {
            Ok(JobResult {
                name: name.clone(),
                combinations: MatrixExpander::expand(matrix)?,
            })
        })
        .collect()
}

/// Final expansion result for one job group. Immutable once produced;
/// consumed by output formatting and underspecification reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    pub name: String,
    pub combinations: Vec<Combination>,
}
