//! Ordering normalization for the verification test results.
//!
//! The image test suite runs its examples in nondeterministic order, so two
//! otherwise identical result files differ in entry order. Before diffing,
//! both sides are rewritten with `examples` stable-sorted by
//! `full_description`.

use std::path::Path;

use serde_json::Value;

use crate::error::{DiffError, DiffResult};

/// Sort the `examples` array of a results document in place.
///
/// Entries without a string `full_description` sort as the empty string.
/// Returns `false` if the document has no `examples` array.
pub fn sort_examples(doc: &mut Value) -> bool {
    match doc.get_mut("examples") {
        Some(Value::Array(examples)) => {
            examples.sort_by(|a, b| description(a).cmp(description(b)));
            true
        }
        _ => false,
    }
}

fn description(entry: &Value) -> &str {
    entry
        .get("full_description")
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Rewrite a results file on disk: examples sorted, pretty-printed with
/// object key order preserved.
pub fn normalize_rspec_results(path: &Path) -> DiffResult<()> {
    let raw = std::fs::read_to_string(path)?;
    let mut doc: Value = serde_json::from_str(&raw).map_err(|source| DiffError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    sort_examples(&mut doc);
    let pretty = serde_json::to_string_pretty(&doc).map_err(|source| DiffError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, pretty)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_by_full_description() {
        let mut doc = json!({
            "version": "3.6.0",
            "examples": [
                {"full_description": "java is installed", "status": "passed"},
                {"full_description": "go is installed", "status": "passed"},
                {"status": "pending"},
            ],
        });
        assert!(sort_examples(&mut doc));
        let order: Vec<&str> = doc["examples"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e.get("full_description").and_then(Value::as_str).unwrap_or(""))
            .collect();
        assert_eq!(order, vec!["", "go is installed", "java is installed"]);
    }

    #[test]
    fn sort_is_stable_for_equal_descriptions() {
        let mut doc = json!({
            "examples": [
                {"full_description": "same", "id": 1},
                {"full_description": "a", "id": 0},
                {"full_description": "same", "id": 2},
            ],
        });
        sort_examples(&mut doc);
        let ids: Vec<i64> = doc["examples"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn documents_without_examples_untouched() {
        let mut doc = json!({"summary": {"example_count": 0}});
        assert!(!sort_examples(&mut doc));
        assert_eq!(doc, json!({"summary": {"example_count": 0}}));
    }

    #[test]
    fn rewrites_file_pretty_with_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("travis_packer_templates_rspec.json");
        std::fs::write(
            &path,
            r#"{"version":"3","examples":[{"full_description":"b"},{"full_description":"a"}]}"#,
        )
        .unwrap();

        normalize_rspec_results(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"version\": \"3\",\n  \"examples\": [\n    {\n      \"full_description\": \"a\"\n    },\n    {\n      \"full_description\": \"b\"\n    }\n  ]\n}"
        );
    }

    proptest::proptest! {
        #[test]
        fn any_permutation_normalizes_identically(
            descriptions in proptest::collection::btree_set("[a-z ]{1,12}", 1..12),
            seed in proptest::prelude::any::<u64>(),
        ) {
            let entries: Vec<Value> = descriptions
                .iter()
                .map(|d| json!({"full_description": d, "status": "passed"}))
                .collect();
            let mut shuffled = entries.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();

            let mut a = json!({"examples": entries});
            let mut b = json!({"examples": shuffled});
            sort_examples(&mut a);
            sort_examples(&mut b);
            proptest::prop_assert_eq!(
                serde_json::to_string_pretty(&a).unwrap(),
                serde_json::to_string_pretty(&b).unwrap()
            );
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            normalize_rspec_results(&path),
            Err(DiffError::Json { .. })
        ));
    }
}
