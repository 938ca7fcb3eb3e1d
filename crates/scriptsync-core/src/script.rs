//! The script snapshot and change detection.

use std::collections::BTreeMap;

/// Relative script path (forward slashes, extension kept) to file content.
///
/// Ordered so that logs and JSON output are stable between runs.
pub type ScriptMap = BTreeMap<String, String>;

/// Returns the paths in `next` that are new or whose content differs from `previous`.
///
/// Paths that disappeared are deliberately not reported. The watcher still
/// replaces the whole map, so removals show up in the served snapshot; they
/// just never produce a log line.
pub fn changed_paths(previous: &ScriptMap, next: &ScriptMap) -> Vec<String> {
    next.iter()
        .filter(|(path, content)| previous.get(*path) != Some(*content))
        .map(|(path, _)| path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> ScriptMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_scan_reports_everything() {
        let next = map(&[("a.lua", "print(1)"), ("b.luau", "print(2)")]);

        let changed = changed_paths(&ScriptMap::new(), &next);
        assert_eq!(changed, vec!["a.lua", "b.luau"]);
    }

    #[test]
    fn test_only_modified_content_is_reported() {
        let previous = map(&[("a.lua", "print(1)"), ("b.luau", "print(2)")]);
        let next = map(&[("a.lua", "print(3)"), ("b.luau", "print(2)")]);

        assert_eq!(changed_paths(&previous, &next), vec!["a.lua"]);
    }

    #[test]
    fn test_removed_paths_are_not_reported() {
        let previous = map(&[("a.lua", "print(1)"), ("gone.lua", "x")]);
        let next = map(&[("a.lua", "print(1)")]);

        assert!(changed_paths(&previous, &next).is_empty());
    }

    #[test]
    fn test_new_and_removed_together() {
        let previous = map(&[("old/init.lua", "return {}")]);
        let next = map(&[("new/init.lua", "return {}")]);

        assert_eq!(changed_paths(&previous, &next), vec!["new/init.lua"]);
    }

    #[test]
    fn test_identical_maps_have_no_changes() {
        let previous = map(&[("a.lua", "")]);
        assert!(changed_paths(&previous, &previous.clone()).is_empty());
    }
}
