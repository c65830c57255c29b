//! Block expansion: recursively resolves fragment references.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{LitError, Result};

use super::fragment::Fragment;
use super::fragment_map::FragmentMap;

/// A reference line: optional indent, `@{name}`, optional trailing whitespace.
static REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>\s*)@\{(?P<name>[\[\]\w\s].*)\}\s*$").unwrap());

/// Cycle detector for re-entrant fragment expansion.
#[derive(Debug, Clone, Default)]
struct CycleDetector {
    /// Stack of names currently being expanded (for error reporting).
    stack: Vec<String>,
    /// Set for O(1) membership checks.
    seen: HashSet<String>,
}

impl CycleDetector {
    fn new() -> Self {
        Self::default()
    }

    /// Enters a fragment, failing if it is already being expanded.
    fn enter(&mut self, name: &str) -> Result<()> {
        if self.seen.contains(name) {
            let mut cycle = self.stack.clone();
            cycle.push(name.to_string());
            return Err(LitError::CircularReference(cycle));
        }
        self.seen.insert(name.to_string());
        self.stack.push(name.to_string());
        Ok(())
    }

    fn exit(&mut self) {
        if let Some(name) = self.stack.pop() {
            self.seen.remove(&name);
        }
    }
}

/// Expands every file fragment into its final output lines.
///
/// The memo guarantees each distinct code fragment's body is expanded at
/// most once per run; every reference site still receives its own
/// independently indented copy of the memoized lines.
pub fn tangle_all<'a>(map: &'a FragmentMap) -> Result<Vec<(&'a Fragment, Vec<String>)>> {
    let mut memo: HashMap<String, Vec<String>> = HashMap::new();
    let mut detector = CycleDetector::new();
    let mut outputs = Vec::new();

    for fragment in map.files() {
        tracing::debug!("expanding file fragment \"{}\"", fragment.name);
        let lines = expand_fragment(fragment, map, &mut memo, &mut detector)?;
        outputs.push((fragment, lines));
    }

    Ok(outputs)
}

/// Recursively expands one fragment's body.
///
/// Reference lines are replaced by the target's expansion, each line
/// prefixed with the reference's leading whitespace; indentation composes
/// additively across nesting because the memoized lines already carry the
/// target's internal indents. Non-reference lines copy through unchanged.
fn expand_fragment(
    fragment: &Fragment,
    map: &FragmentMap,
    memo: &mut HashMap<String, Vec<String>>,
    detector: &mut CycleDetector,
) -> Result<Vec<String>> {
    let mut output = Vec::new();

    for line in &fragment.lines {
        let Some(caps) = REF_PATTERN.captures(line) else {
            output.push(line.clone());
            continue;
        };
        let indent = &caps["indent"];
        let target = &caps["name"];

        if !memo.contains_key(target) {
            let child = map.code(target).ok_or_else(|| LitError::UndefinedReference {
                name: target.to_string(),
                referrer: fragment.name.clone(),
                location: fragment.location.clone(),
            })?;
            detector.enter(target)?;
            let expanded = expand_fragment(child, map, memo, detector)?;
            detector.exit();
            memo.insert(target.to_string(), expanded);
        }

        for expanded_line in &memo[target] {
            output.push(format!("{}{}", indent, expanded_line));
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_location::TextLocation;
    use pretty_assertions::assert_eq;

    fn make_map(code: &[(&str, &[&str])], files: &[(&str, &[&str])]) -> FragmentMap {
        let mut map = FragmentMap::new();
        for (line, (name, body)) in code.iter().enumerate() {
            let mut fragment = Fragment::code(*name, TextLocation::new("test.md", line + 1), false);
            for l in *body {
                fragment.push_line(*l);
            }
            map.insert(fragment).unwrap();
        }
        for (line, (name, body)) in files.iter().enumerate() {
            let mut fragment =
                Fragment::file(*name, TextLocation::new("test.md", 100 + line), false);
            for l in *body {
                fragment.push_line(*l);
            }
            map.insert(fragment).unwrap();
        }
        map
    }

    fn lines_for<'a>(outputs: &'a [(&Fragment, Vec<String>)], name: &str) -> &'a [String] {
        &outputs
            .iter()
            .find(|(fragment, _)| fragment.name == name)
            .unwrap()
            .1
    }

    #[test]
    fn test_plain_lines_copy_through() {
        let map = make_map(&[], &[("out.txt", &["alpha", "", "beta"])]);
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(lines_for(&outputs, "out.txt"), ["alpha", "", "beta"]);
    }

    #[test]
    fn test_simple_reference() {
        let map = make_map(
            &[("body", &["print('hello')"])],
            &[("out.py", &["def main():", "    @{body}"])],
        );
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(
            lines_for(&outputs, "out.py"),
            ["def main():", "    print('hello')"]
        );
    }

    #[test]
    fn test_nested_indent_composes_additively() {
        let map = make_map(
            &[
                ("outer", &["if True:", "    @{inner}"]),
                ("inner", &["if True:", "    @{deepest}"]),
                ("deepest", &["print('deep')"]),
            ],
            &[("out.py", &["@{outer}"])],
        );
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(
            lines_for(&outputs, "out.py"),
            ["if True:", "    if True:", "        print('deep')"]
        );
    }

    #[test]
    fn test_tab_indent_preserved_literally() {
        let map = make_map(
            &[("body", &["x = 1"])],
            &[("out.py", &["\t@{body}"])],
        );
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(lines_for(&outputs, "out.py"), ["\tx = 1"]);
    }

    #[test]
    fn test_double_reference_gets_independent_indents() {
        let map = make_map(
            &[("b", &["beta"])],
            &[("out.txt", &["@{b}", "    @{b}"])],
        );
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(lines_for(&outputs, "out.txt"), ["beta", "    beta"]);
    }

    #[test]
    fn test_reference_with_trailing_whitespace() {
        let map = make_map(&[("b", &["beta"])], &[("out.txt", &["  @{b}   "])]);
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(lines_for(&outputs, "out.txt"), ["  beta"]);
    }

    #[test]
    fn test_non_reference_at_sign_copies_through() {
        let map = make_map(&[], &[("out.txt", &["user@{host} extra"])]);
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(lines_for(&outputs, "out.txt"), ["user@{host} extra"]);
    }

    #[test]
    fn test_undefined_reference() {
        let map = make_map(
            &[("greet", &["@{name}"])],
            &[("out.txt", &["@{greet}"])],
        );
        let err = tangle_all(&map).unwrap_err();
        match err {
            LitError::UndefinedReference { name, referrer, .. } => {
                assert_eq!(name, "name");
                assert_eq!(referrer, "greet");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_circular_reference() {
        let map = make_map(
            &[("a", &["@{b}"]), ("b", &["@{c}"]), ("c", &["@{a}"])],
            &[("out.txt", &["@{a}"])],
        );
        let err = tangle_all(&map).unwrap_err();
        match err {
            LitError::CircularReference(cycle) => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_circular() {
        let map = make_map(&[("a", &["@{a}"])], &[("out.txt", &["@{a}"])]);
        let err = tangle_all(&map).unwrap_err();
        assert!(matches!(err, LitError::CircularReference(_)));
    }

    #[test]
    fn test_memo_shared_across_file_fragments() {
        let map = make_map(
            &[("shared", &["common"])],
            &[("a.txt", &["@{shared}"]), ("b.txt", &["  @{shared}"])],
        );
        let outputs = tangle_all(&map).unwrap();
        assert_eq!(lines_for(&outputs, "a.txt"), ["common"]);
        assert_eq!(lines_for(&outputs, "b.txt"), ["  common"]);
    }

    #[test]
    fn test_file_fragments_expand_in_insertion_order() {
        let map = make_map(&[], &[("first", &["1"]), ("second", &["2"])]);
        let outputs = tangle_all(&map).unwrap();
        let names: Vec<&str> = outputs
            .iter()
            .map(|(fragment, _)| fragment.name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }
}
