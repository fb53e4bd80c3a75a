// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decode xcresulttool document-location URLs into repository-relative 1-based source locations
// role: parsing/locations
// inputs: Raw URL-shaped string, configured path prefix (explicit parameter, never read from env)
// outputs: Option<SourceLocation>; None on anything unparseable
// invariants: Never panics or errors; line numbers are converted 0-based -> 1-based; unknown fragment keys are ignored
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::SourceLocation;

/// Resolve a document-location reference like
/// `file:///work/proj/Tests/FooTests.swift#StartingLineNumber=21&EndingLineNumber=23`
/// into a repo-relative location. `path_prefix` is stripped from the front of
/// the path when it matches; otherwise the path is kept unchanged.
pub fn resolve(raw: &str, path_prefix: &str) -> Option<SourceLocation> {
  let rest = raw.split_once("://").map(|(_, r)| r)?;

  let (path_part, fragment) = match rest.split_once('#') {
    Some((p, f)) => (p, Some(f)),
    None => (rest, None),
  };

  // Query strings are not part of the file path.
  let path_part = path_part.split_once('?').map_or(path_part, |(p, _)| p);
  if path_part.is_empty() {
    return None;
  }

  let file = strip_prefix(path_part, path_prefix);

  let mut start_line: Option<u32> = None;
  let mut end_line: Option<u32> = None;

  if let Some(frag) = fragment {
    for pair in frag.split('&') {
      let Some((key, value)) = pair.split_once('=') else { continue };
      match key {
        "StartingLineNumber" => start_line = parse_one_based(value),
        "EndingLineNumber" => end_line = parse_one_based(value),
        _ => {}
      }
    }
  }

  if end_line.is_none() {
    end_line = start_line;
  }

  Some(SourceLocation {
    file: file.to_string(),
    start_line,
    end_line,
  })
}

/// Upstream line numbers are 0-based; GitHub wants 1-based. A value of
/// u32::MAX cannot be shifted and is treated as unrecognized.
fn parse_one_based(value: &str) -> Option<u32> {
  value.trim().parse::<u32>().ok().and_then(|n| n.checked_add(1))
}

fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
  if prefix.is_empty() {
    return path;
  }
  match path.strip_prefix(prefix) {
    Some(rest) => rest.strip_prefix('/').unwrap_or(rest),
    None => path,
  }
}
