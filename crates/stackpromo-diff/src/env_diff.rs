//! Environment-level diff: compare the env variables of two images.
//!
//! The textual `env.diff` artifact is a unified diff of the rendered
//! `KEY=VALUE` files; [`EnvDiff`] is the key-level view of the same change,
//! used for progress output and the CLI summary.

use std::collections::BTreeMap;

use serde::Serialize;

/// The result of comparing two environments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EnvDiff {
    /// Changes in key order.
    pub changes: Vec<EnvChange>,
}

impl EnvDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn additions(&self) -> usize {
        self.count(|c| matches!(c, EnvChange::Added { .. }))
    }

    pub fn removals(&self) -> usize {
        self.count(|c| matches!(c, EnvChange::Removed { .. }))
    }

    pub fn modifications(&self) -> usize {
        self.count(|c| matches!(c, EnvChange::Modified { .. }))
    }

    fn count(&self, pred: impl Fn(&EnvChange) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }
}

/// A single change between two environments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum EnvChange {
    Added { key: String, value: String },
    Removed { key: String, value: String },
    Modified { key: String, old: String, new: String },
}

impl EnvChange {
    pub fn key(&self) -> &str {
        match self {
            EnvChange::Added { key, .. }
            | EnvChange::Removed { key, .. }
            | EnvChange::Modified { key, .. } => key,
        }
    }
}

/// Compare two environments key by key.
pub fn diff_env(old: &BTreeMap<String, String>, new: &BTreeMap<String, String>) -> EnvDiff {
    let mut changes = Vec::new();

    for (key, old_val) in old {
        match new.get(key) {
            Some(new_val) if new_val != old_val => changes.push(EnvChange::Modified {
                key: key.clone(),
                old: old_val.clone(),
                new: new_val.clone(),
            }),
            Some(_) => {}
            None => changes.push(EnvChange::Removed {
                key: key.clone(),
                value: old_val.clone(),
            }),
        }
    }

    for (key, new_val) in new {
        if !old.contains_key(key) {
            changes.push(EnvChange::Added {
                key: key.clone(),
                value: new_val.clone(),
            });
        }
    }

    changes.sort_by(|a, b| a.key().cmp(b.key()));
    EnvDiff { changes }
}

/// Render an environment as `KEY=VALUE` lines sorted by key, each line
/// newline-terminated.
pub fn render_env(env: &BTreeMap<String, String>) -> String {
    env.iter().map(|(k, v)| format!("{k}={v}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn identical_envs_no_diff() {
        let e = env(&[("A", "1"), ("B", "2")]);
        assert!(diff_env(&e, &e).is_empty());
    }

    #[test]
    fn single_modification() {
        let diff = diff_env(&env(&[("A", "1"), ("B", "2")]), &env(&[("A", "1"), ("B", "3")]));
        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.changes[0],
            EnvChange::Modified {
                key: "B".into(),
                old: "2".into(),
                new: "3".into()
            }
        );
    }

    #[test]
    fn mixed_changes_in_key_order() {
        let old = env(&[("KEEP", "x"), ("MODIFY", "old"), ("REMOVE", "1")]);
        let new = env(&[("ADDED", "y"), ("KEEP", "x"), ("MODIFY", "new")]);

        let diff = diff_env(&old, &new);
        assert_eq!(diff.len(), 3);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.removals(), 1);
        assert_eq!(diff.modifications(), 1);
        let keys: Vec<&str> = diff.changes.iter().map(EnvChange::key).collect();
        assert_eq!(keys, vec!["ADDED", "MODIFY", "REMOVE"]);
    }

    #[test]
    fn render_sorted_lines() {
        let rendered = render_env(&env(&[("Z", "last"), ("A", "first")]));
        assert_eq!(rendered, "A=first\nZ=last\n");
    }

    #[test]
    fn render_empty() {
        assert_eq!(render_env(&BTreeMap::new()), "");
    }
}
