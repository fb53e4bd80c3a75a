// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map canonical issues to GitHub Check Run annotations with per-kind gating and the platform count ceiling
// role: processing/annotations
// inputs: RunSummary, GenerationSettings (explicit parameters)
// outputs: Vec<Annotation>, at most MAX_ANNOTATIONS entries
// invariants: Order is test failures, warnings, errors, each preserving source order; truncation keeps the first 50; no issue is dropped for lacking a location
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{Annotation, AnnotationLevel, Issue, RunSummary, SourceLocation};
use crate::settings::GenerationSettings;

/// GitHub rejects check-run updates carrying more than 50 annotations.
pub const MAX_ANNOTATIONS: usize = 50;

/// Placeholder anchor for issues without a resolvable location. GitHub
/// requires a path and 1-based lines on every annotation, so locationless
/// issues are pinned to "unknown":1 rather than dropped.
const UNKNOWN_PATH: &str = "unknown";

pub fn generate_annotations(run: &RunSummary, settings: &GenerationSettings) -> Vec<Annotation> {
  let mut annotations: Vec<Annotation> = Vec::new();

  if settings.test_failure_annotations {
    for failure in &run.issues.test_failures {
      let (path, start_line, end_line) = anchor(failure.location.as_ref());
      annotations.push(Annotation {
        path,
        start_line,
        end_line,
        start_column: None,
        end_column: None,
        annotation_level: AnnotationLevel::Failure,
        title: format!("{} failed", failure.test_name),
        message: failure.failure_text.clone(),
      });
    }
  }

  if settings.warning_annotations {
    for issue in &run.issues.warnings {
      annotations.push(issue_annotation(issue, AnnotationLevel::Warning, "Warning", "Warning occurred"));
    }
  }

  if settings.error_annotations {
    for issue in &run.issues.errors {
      annotations.push(issue_annotation(issue, AnnotationLevel::Failure, "Error", "Error occurred"));
    }
  }

  annotations.truncate(MAX_ANNOTATIONS);
  annotations
}

fn issue_annotation(issue: &Issue, level: AnnotationLevel, kind: &str, fallback_message: &str) -> Annotation {
  let (path, start_line, end_line) = anchor(issue.location.as_ref());
  let message = if issue.message.is_empty() {
    fallback_message.to_string()
  } else {
    issue.message.clone()
  };

  Annotation {
    path,
    start_line,
    end_line,
    start_column: None,
    end_column: None,
    annotation_level: level,
    title: issue.issue_type.clone().unwrap_or_else(|| kind.to_string()),
    message,
  }
}

/// A location with a file but no lines anchors at line 1; no location at all
/// anchors at "unknown":1. Line 0 is never emitted.
fn anchor(location: Option<&SourceLocation>) -> (String, u32, u32) {
  match location {
    Some(loc) => {
      let start = loc.start_line.unwrap_or(1);
      let end = loc.end_line.unwrap_or(start);
      (loc.file.clone(), start, end)
    }
    None => (UNKNOWN_PATH.to_string(), 1, 1),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{IssueSet, TestFailure};

  fn issue(kind: &str, msg: &str, loc: Option<SourceLocation>) -> Issue {
    Issue {
      issue_type: Some(kind.to_string()),
      message: msg.to_string(),
      location: loc,
    }
  }

  fn failure(name: &str) -> TestFailure {
    TestFailure {
      test_name: name.to_string(),
      target_name: "AppTests".into(),
      failure_text: "XCTAssertTrue failed".into(),
      location: Some(SourceLocation {
        file: "Tests/AppTests.swift".into(),
        start_line: Some(12),
        end_line: Some(12),
      }),
    }
  }

  fn run_with(issues: IssueSet) -> RunSummary {
    RunSummary {
      issues,
      ..RunSummary::default()
    }
  }

  #[test]
  fn kinds_are_gated_individually() {
    let run = run_with(IssueSet {
      test_failures: vec![failure("testA()")],
      warnings: vec![issue("Deprecation", "old", None)],
      errors: vec![issue("Swift Compiler Error", "bad", None)],
    });

    let mut settings = GenerationSettings::default();
    settings.warning_annotations = false;

    let anns = generate_annotations(&run, &settings);
    assert_eq!(anns.len(), 2);
    assert!(anns.iter().all(|a| a.annotation_level == AnnotationLevel::Failure));

    settings.warning_annotations = true;
    settings.test_failure_annotations = false;
    settings.error_annotations = false;
    let anns = generate_annotations(&run, &settings);
    assert_eq!(anns.len(), 1);
    assert_eq!(anns[0].annotation_level, AnnotationLevel::Warning);
  }

  #[test]
  fn order_is_failures_then_warnings_then_errors() {
    let run = run_with(IssueSet {
      test_failures: vec![failure("testA()"), failure("testB()")],
      warnings: vec![issue("W", "w1", None)],
      errors: vec![issue("E", "e1", None)],
    });

    let anns = generate_annotations(&run, &GenerationSettings::default());
    let titles: Vec<&str> = anns.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["testA() failed", "testB() failed", "W", "E"]);
  }

  #[test]
  fn truncation_keeps_the_first_fifty_in_kind_order() {
    let run = run_with(IssueSet {
      test_failures: (0..30).map(|i| failure(&format!("test{i}()"))).collect(),
      warnings: (0..30).map(|i| issue("W", &format!("w{i}"), None)).collect(),
      errors: vec![issue("E", "never kept", None)],
    });

    let anns = generate_annotations(&run, &GenerationSettings::default());
    assert_eq!(anns.len(), MAX_ANNOTATIONS);
    assert_eq!(anns[29].title, "test29() failed");
    assert_eq!(anns[30].title, "W");
    assert_eq!(anns[49].message, "w19");
    assert!(!anns.iter().any(|a| a.title == "E"));
  }

  #[test]
  fn locationless_issue_gets_placeholder_not_dropped() {
    let run = run_with(IssueSet {
      errors: vec![issue("Linker Error", "", None)],
      ..IssueSet::default()
    });

    let anns = generate_annotations(&run, &GenerationSettings::default());
    assert_eq!(anns.len(), 1);
    assert_eq!(anns[0].path, "unknown");
    assert_eq!(anns[0].start_line, 1);
    assert_eq!(anns[0].end_line, 1);
    assert_eq!(anns[0].message, "Error occurred");
  }

  #[test]
  fn file_without_lines_anchors_at_line_one() {
    let run = run_with(IssueSet {
      warnings: vec![issue(
        "W",
        "m",
        Some(SourceLocation {
          file: "Sources/A.swift".into(),
          start_line: None,
          end_line: None,
        }),
      )],
      ..IssueSet::default()
    });

    let anns = generate_annotations(&run, &GenerationSettings::default());
    assert_eq!(anns[0].path, "Sources/A.swift");
    assert_eq!(anns[0].start_line, 1);
    assert_eq!(anns[0].end_line, 1);
  }

  #[test]
  fn missing_issue_type_falls_back_to_kind_word() {
    let run = run_with(IssueSet {
      warnings: vec![Issue {
        issue_type: None,
        message: "m".into(),
        location: None,
      }],
      ..IssueSet::default()
    });
    let anns = generate_annotations(&run, &GenerationSettings::default());
    assert_eq!(anns[0].title, "Warning");
  }

  proptest::proptest! {
    #[test]
    fn never_exceeds_the_ceiling_and_keeps_a_prefix(
      failures in 0usize..70,
      warnings in 0usize..70,
      errors in 0usize..70,
    ) {
      let run = run_with(IssueSet {
        test_failures: (0..failures).map(|i| failure(&format!("test{i}()"))).collect(),
        warnings: (0..warnings).map(|i| issue("W", &format!("w{i}"), None)).collect(),
        errors: (0..errors).map(|i| issue("E", &format!("e{i}"), None)).collect(),
      });

      let anns = generate_annotations(&run, &GenerationSettings::default());
      let total = failures + warnings + errors;
      proptest::prop_assert_eq!(anns.len(), total.min(MAX_ANNOTATIONS));

      // The kept set is always the untruncated sequence's prefix.
      let full = run.issues.test_failures.len() + run.issues.warnings.len();
      for (i, ann) in anns.iter().enumerate() {
        let expected = if i < run.issues.test_failures.len() {
          AnnotationLevel::Failure
        } else if i < full {
          AnnotationLevel::Warning
        } else {
          AnnotationLevel::Failure
        };
        proptest::prop_assert_eq!(ann.annotation_level, expected);
      }
    }
  }
}
