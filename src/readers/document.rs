//! Source-graph parsing: fragment extraction and document-link discovery.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{LitError, Result};
use crate::model::{Fragment, FragmentMap};
use crate::text_location::TextLocation;

/// Inline markdown link whose target is another literate document.
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\w+\]\((?P<path>.*?\.md)\)").unwrap());

const FILE_HEADER_PREFIX: &str = "@file ";
const CODE_HEADER_PREFIX: &str = "@code ";
const EXECUTABLE_SUFFIX: &str = " +x";
const APPEND_SUFFIX: &str = " +=";
const FENCE: &str = "```";

/// URL schemes that are never treated as local documents.
const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

/// Scanner state while walking a document's lines.
enum ScanState {
    Outside,
    Inside(Fragment),
}

/// Parses the document graph rooted at `root` into the two fragment tables.
///
/// Documents linked with `[label](other.md)` are queued breadth-first and
/// visited once each; a linked document that cannot be read is a warning,
/// not a failure.
pub fn parse_document_graph(root: &Path) -> Result<FragmentMap> {
    let mut map = FragmentMap::new();
    let mut worklist: VecDeque<PathBuf> = VecDeque::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    worklist.push_back(root.to_path_buf());
    seen.insert(root.to_path_buf());

    while let Some(source) = worklist.pop_front() {
        let content = match fs::read_to_string(&source) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("document \"{}\" not found, skipping: {}", source.display(), err);
                continue;
            }
        };
        tracing::debug!("parsing document \"{}\"", source.display());
        scan_document(&source, &content, &mut map, &mut worklist, &mut seen)?;
    }

    Ok(map)
}

/// Scans one document with the two-state fragment machine.
fn scan_document(
    source: &Path,
    content: &str,
    map: &mut FragmentMap,
    worklist: &mut VecDeque<PathBuf>,
    seen: &mut HashSet<PathBuf>,
) -> Result<()> {
    let lines: Vec<&str> = content.lines().collect();
    let mut state = ScanState::Outside;
    let mut skip_next = false;

    for (index, &line) in lines.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        state = match state {
            ScanState::Outside => {
                let next = lines.get(index + 1).copied();
                match fragment_start(line, next, source, index + 1)? {
                    Some(fragment) => {
                        // The delimiter line belongs to the fragment syntax.
                        skip_next = true;
                        ScanState::Inside(fragment)
                    }
                    None => {
                        collect_links(line, source, worklist, seen);
                        ScanState::Outside
                    }
                }
            }
            ScanState::Inside(mut fragment) => {
                if line == FENCE {
                    map.insert(fragment)?;
                    ScanState::Outside
                } else {
                    fragment.push_line(line);
                    ScanState::Inside(fragment)
                }
            }
        };
    }

    if let ScanState::Inside(fragment) = state {
        return Err(LitError::UnterminatedFragment {
            name: fragment.name,
            location: fragment.location,
        });
    }
    Ok(())
}

/// Tests the current and next line against the file-start and code-start
/// patterns, in that priority order.
///
/// The `+x` / `+=` modifier is stripped only when it sits exactly at the
/// end of the header.
fn fragment_start(
    line: &str,
    next: Option<&str>,
    source: &Path,
    line_number: usize,
) -> Result<Option<Fragment>> {
    let Some(next) = next else { return Ok(None) };
    if !next.starts_with(FENCE) {
        return Ok(None);
    }
    let location = TextLocation::new(source, line_number);

    if let Some(header) = line.strip_prefix(FILE_HEADER_PREFIX) {
        let (name, executable) = strip_modifier(header, EXECUTABLE_SUFFIX);
        if name.is_empty() {
            return Err(LitError::MalformedHeader { location });
        }
        return Ok(Some(Fragment::file(name, location, executable)));
    }

    if let Some(header) = line.strip_prefix(CODE_HEADER_PREFIX) {
        let (name, append) = strip_modifier(header, APPEND_SUFFIX);
        if name.is_empty() {
            return Err(LitError::MalformedHeader { location });
        }
        return Ok(Some(Fragment::code(name, location, append)));
    }

    Ok(None)
}

fn strip_modifier<'a>(header: &'a str, suffix: &str) -> (&'a str, bool) {
    match header.strip_suffix(suffix) {
        Some(name) => (name, true),
        None => (header, false),
    }
}

/// Queues every linked local document on this line that has not been
/// processed or queued already, resolved relative to the current document.
fn collect_links(
    line: &str,
    source: &Path,
    worklist: &mut VecDeque<PathBuf>,
    seen: &mut HashSet<PathBuf>,
) {
    for caps in LINK_PATTERN.captures_iter(line) {
        let path = &caps["path"];
        if EXTERNAL_SCHEMES.iter().any(|scheme| path.starts_with(scheme)) {
            continue;
        }
        let resolved = match source.parent() {
            Some(dir) => dir.join(path),
            None => PathBuf::from(path),
        };
        if seen.insert(resolved.clone()) {
            tracing::debug!("queueing linked document \"{}\"", resolved.display());
            worklist.push_back(resolved);
        }
    }
}
