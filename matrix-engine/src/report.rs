// Underspecification analysis
// Flags combinations missing keys that other combinations in the same job carry

use crate::expand::Combination;

/// One underspecified combination: its position in the job's combination
/// list and the exact keys it lacks relative to the job-wide key union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Underspecified {
    pub index: usize,
    pub missing_keys: Vec<String>,
}

/// Compare each combination's key set against the union of keys across
/// the whole job group. A combination is flagged iff its key set is a
/// strict subset of the union. Read-only; combinations are never altered.
pub fn underspecified_combinations(combinations: &[Combination]) -> Vec<Underspecified> {
    let mut union: Vec<&str> = Vec::new();
    for combination in combinations {
        for key in combination.keys() {
            if !union.contains(&key) {
                union.push(key);
            }
        }
    }

    combinations
        .iter()
        .enumerate()
        .filter_map(|(index, combination)| {
            let missing_keys: Vec<String> = union
                .iter()
                .filter(|&&key| !combination.contains_key(key))
                .map(|&key| key.to_string())
                .collect();

            if missing_keys.is_empty() {
                None
            } else {
                Some(Underspecified {
                    index,
                    missing_keys,
                })
            }
        })
        .collect()
}
