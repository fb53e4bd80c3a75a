// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalize the three flat compact documents (build-results, test summary, detailed tests) into the canonical RunSummary
// role: parsing/compact-schema
// inputs: Raw JSON text per sub-document (each optional), path prefix
// outputs: RunSummary; absent sub-documents contribute defaults, a present but non-JSON one is MalformedDocument
// invariants: Detailed test nodes win for failure locations; the summary testFailures list is the fallback; XCTest line numbers are already 1-based
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::NormalizeError;
use crate::location;
use crate::model::{ActionRecord, Issue, IssueSet, Metrics, RunStatus, RunSummary, SourceLocation, TestFailure};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BuildResultsDoc {
  action_title: Option<String>,
  status: Option<String>,
  error_count: Option<u64>,
  warning_count: Option<u64>,
  errors: Vec<IssueDoc>,
  warnings: Vec<IssueDoc>,
  start_time: Option<f64>,
  end_time: Option<f64>,
  destination: Option<DestinationDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IssueDoc {
  issue_type: Option<String>,
  message: Option<String>,
  #[serde(rename = "sourceURL")]
  source_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DestinationDoc {
  device_name: Option<String>,
  platform: Option<String>,
  os_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestSummaryDoc {
  title: Option<String>,
  result: Option<String>,
  total_test_count: Option<u64>,
  failed_tests: Option<u64>,
  skipped_tests: Option<u64>,
  expected_failures: Option<u64>,
  start_time: Option<f64>,
  finish_time: Option<f64>,
  test_failures: Vec<TestFailureDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestFailureDoc {
  test_name: Option<String>,
  target_name: Option<String>,
  failure_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestDetailDoc {
  test_nodes: Vec<TestNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestNode {
  node_type: String,
  name: String,
  result: Option<String>,
  children: Vec<TestNode>,
}

pub fn normalize(
  build: Option<&str>,
  tests: Option<&str>,
  detail: Option<&str>,
  path_prefix: &str,
) -> Result<RunSummary, NormalizeError> {
  let build: BuildResultsDoc = parse_or_default(build)?;
  let tests: TestSummaryDoc = parse_or_default(tests)?;
  let detail: TestDetailDoc = parse_or_default(detail)?;

  let metrics = Metrics {
    tests_total: tests.total_test_count.unwrap_or(0),
    tests_failed: tests.failed_tests.unwrap_or(0),
    tests_skipped: tests.skipped_tests.unwrap_or(0),
    expected_failures: tests.expected_failures.unwrap_or(0),
    warnings: build.warning_count.unwrap_or(0),
    errors: build.error_count.unwrap_or(0),
    build_status: build.status.as_deref().map(RunStatus::from_label).unwrap_or_default(),
    test_status: tests.result.as_deref().map(RunStatus::from_label).unwrap_or_default(),
  };

  let mut failures = collect_detailed_failures(&detail.test_nodes);
  if failures.is_empty() {
    // Older invocations only expose the summary-level list, which carries no
    // source locations.
    failures = tests
      .test_failures
      .iter()
      .map(|f| TestFailure {
        test_name: f.test_name.clone().unwrap_or_default(),
        target_name: f.target_name.clone().unwrap_or_default(),
        failure_text: f.failure_text.clone().unwrap_or_default(),
        location: None,
      })
      .collect();
  }

  let issues = IssueSet {
    test_failures: failures,
    warnings: map_issues(&build.warnings, path_prefix),
    errors: map_issues(&build.errors, path_prefix),
  };

  let mut actions: Vec<ActionRecord> = Vec::new();
  if build.action_title.is_some() || build.start_time.is_some() || build.destination.is_some() {
    let destination = build.destination.unwrap_or_default();
    actions.push(ActionRecord {
      title: build.action_title,
      scheme: None,
      started_time: build.start_time,
      ended_time: build.end_time,
      destination: destination.device_name,
      sdk_name: destination.platform,
      sdk_version: destination.os_version,
    });
  }
  if tests.title.is_some() || tests.start_time.is_some() {
    actions.push(ActionRecord {
      title: tests.title,
      started_time: tests.start_time,
      ended_time: tests.finish_time,
      ..ActionRecord::default()
    });
  }

  Ok(RunSummary {
    metrics,
    issues,
    actions,
  })
}

fn parse_or_default<T: Default + serde::de::DeserializeOwned>(raw: Option<&str>) -> Result<T, NormalizeError> {
  match raw {
    Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(text)?),
    _ => Ok(T::default()),
  }
}

fn map_issues(docs: &[IssueDoc], path_prefix: &str) -> Vec<Issue> {
  docs
    .iter()
    .map(|doc| Issue {
      issue_type: doc.issue_type.clone(),
      message: doc.message.clone().unwrap_or_default(),
      location: doc.source_url.as_deref().and_then(|u| location::resolve(u, path_prefix)),
    })
    .collect()
}

/// Walk the detailed test-node tree collecting failed test cases. The target
/// name comes from the nearest enclosing test bundle node; failure text and
/// source position come from `Failure Message` children.
fn collect_detailed_failures(nodes: &[TestNode]) -> Vec<TestFailure> {
  let mut out = Vec::new();
  walk_nodes(nodes, "", &mut out);
  out
}

fn walk_nodes(nodes: &[TestNode], target: &str, out: &mut Vec<TestFailure>) {
  for node in nodes {
    let current_target = if node.node_type == "Unit test bundle" || node.node_type == "UI test bundle" {
      node.name.as_str()
    } else {
      target
    };

    if node.node_type == "Test Case" && node.result.as_deref() == Some("Failed") {
      for child in &node.children {
        if child.node_type == "Failure Message" {
          out.push(parse_failure_message(&child.name, &node.name, current_target));
        }
      }
    }

    walk_nodes(&node.children, current_target, out);
  }
}

/// XCTest prints `FooTests.swift:22: XCTAssertTrue failed - details`; the
/// line number there is already 1-based. Anything else becomes a failure
/// without location.
fn parse_failure_message(message: &str, test_name: &str, target_name: &str) -> TestFailure {
  static FAILURE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+\.swift):(\d+):\s*(.+)$").unwrap());

  if let Some(caps) = FAILURE_RE.captures(message) {
    if let Ok(line) = caps[2].parse::<u32>() {
      return TestFailure {
        test_name: test_name.to_string(),
        target_name: target_name.to_string(),
        failure_text: caps[3].to_string(),
        location: Some(SourceLocation {
          file: caps[1].to_string(),
          start_line: Some(line),
          end_line: Some(line),
        }),
      };
    }
  }

  TestFailure {
    test_name: test_name.to_string(),
    target_name: target_name.to_string(),
    failure_text: message.to_string(),
    location: None,
  }
}
