//! Per-namespace group comparison.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::schema::ComponentMap;
use crate::config::value::ConfigGroup;

/// Result of comparing two component maps. Names keep their original case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDiff {
    pub changed: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl GroupDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Every changed, added and removed name, lowercased.
    pub fn into_changed_names(self) -> BTreeSet<String> {
        self.changed
            .into_iter()
            .chain(self.added)
            .chain(self.removed)
            .map(|name| name.to_lowercase())
            .collect()
    }
}

/// Classify every component of `old` and `new` as changed, added, removed
/// or unchanged (omitted).
pub fn compare_config_groups(old: &ComponentMap, new: &ComponentMap) -> GroupDiff {
    // Names still in `remaining` after walking `new` were removed.
    let mut remaining: BTreeMap<&str, &ConfigGroup> =
        old.iter().map(|(name, group)| (name.as_str(), group)).collect();
    let mut diff = GroupDiff::default();

    for (name, group) in new {
        match remaining.remove(name.as_str()) {
            Some(previous) => {
                if previous != group {
                    diff.changed.push(name.clone());
                }
            }
            None => diff.added.push(name.clone()),
        }
    }
    diff.removed = remaining.into_keys().map(str::to_string).collect();
    diff
}

/// Lowercased names of components whose settings changed, appeared or
/// disappeared between `old` and `new`.
pub fn changed_config_groups(old: &ComponentMap, new: &ComponentMap) -> BTreeSet<String> {
    compare_config_groups(old, new).into_changed_names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::ConfigValue;

    fn group(pairs: &[(&str, ConfigValue)]) -> ConfigGroup {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn components(entries: &[(&str, ConfigGroup)]) -> ComponentMap {
        entries
            .iter()
            .map(|(name, g)| (name.to_string(), g.clone()))
            .collect()
    }

    #[test]
    fn test_classifies_each_name_once() {
        let old = components(&[
            ("Header", group(&[("primary_mail_host", "a".into())])),
            ("Debugger", group(&[("log_received_mails", true.into())])),
            ("Compressor", group(&[])),
        ]);
        let new = components(&[
            ("Header", group(&[("primary_mail_host", "b".into())])),
            ("Debugger", group(&[("log_received_mails", true.into())])),
            ("Hasher", group(&[])),
        ]);

        let diff = compare_config_groups(&old, &new);
        assert_eq!(diff.changed, vec!["Header"]);
        assert_eq!(diff.added, vec!["Hasher"]);
        assert_eq!(diff.removed, vec!["Compressor"]);

        // Caller's map untouched
        assert_eq!(old.len(), 3);
    }

    #[test]
    fn test_identical_maps() {
        let old = components(&[("Header", group(&[("k", 1.into())]))]);
        let diff = compare_config_groups(&old, &old.clone());
        assert!(diff.is_empty());
        assert!(changed_config_groups(&old, &old).is_empty());
    }

    #[test]
    fn test_empty_sides() {
        let some = components(&[("A", group(&[])), ("B", group(&[]))]);
        let none = ComponentMap::new();

        let added = compare_config_groups(&none, &some);
        assert_eq!(added.added, vec!["A", "B"]);
        assert!(added.changed.is_empty() && added.removed.is_empty());

        let removed = compare_config_groups(&some, &none);
        assert_eq!(removed.removed, vec!["A", "B"]);
        assert!(removed.changed.is_empty() && removed.added.is_empty());
    }

    #[test]
    fn test_changed_names_lowercased() {
        let old = components(&[("Header", group(&[("k", 1.into())])), ("Gone", group(&[]))]);
        let new = components(&[("Header", group(&[("k", 2.into())])), ("NewOne", group(&[]))]);

        let names = changed_config_groups(&old, &new);
        assert_eq!(
            names,
            BTreeSet::from(["header".to_string(), "gone".to_string(), "newone".to_string()])
        );
    }

    #[test]
    fn test_added_key_counts_as_change() {
        let old = components(&[("Header", group(&[("a", 1.into())]))]);
        let new = components(&[("Header", group(&[("a", 1.into()), ("b", 2.into())]))]);
        assert_eq!(compare_config_groups(&old, &new).changed, vec!["Header"]);
    }
}
