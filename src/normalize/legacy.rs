// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalize the legacy wrapped ActionsInvocationRecord document into the canonical RunSummary
// role: parsing/legacy-schema
// inputs: Parsed serde_json::Value of the monolithic invocation record, path prefix
// outputs: RunSummary; every missing wrapper degrades to a default instead of failing
// invariants: Scalars live under _value (string-encoded ints), lists under _values; statuses are derived from action records
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde_json::Value;

use crate::ext::serde_json::JsonFetch;
use crate::location;
use crate::model::{ActionRecord, Issue, IssueSet, Metrics, RunStatus, RunSummary, TestFailure};

pub fn normalize(doc: &Value, path_prefix: &str) -> RunSummary {
  let actions = collect_actions(doc);

  let metrics = Metrics {
    tests_total: doc.fetch("metrics.testsCount").legacy_u64().unwrap_or(0),
    tests_failed: doc.fetch("metrics.testsFailedCount").legacy_u64().unwrap_or(0),
    tests_skipped: doc.fetch("metrics.testsSkippedCount").legacy_u64().unwrap_or(0),
    expected_failures: 0, // the legacy record does not report these
    warnings: doc.fetch("metrics.warningCount").legacy_u64().unwrap_or(0),
    errors: doc.fetch("metrics.errorCount").legacy_u64().unwrap_or(0),
    build_status: combined_status(doc, "buildResult.status"),
    test_status: combined_status(doc, "actionResult.status"),
  };

  let issues = IssueSet {
    test_failures: collect_test_failures(doc, path_prefix),
    warnings: collect_issues(doc, "issues.warningSummaries", path_prefix),
    errors: collect_issues(doc, "issues.errorSummaries", path_prefix),
  };

  RunSummary {
    metrics,
    issues,
    actions,
  }
}

/// Fold per-action statuses into one verdict: any failure wins, otherwise any
/// success, otherwise unknown (no actions, or actions without that result).
fn combined_status(doc: &Value, status_path: &str) -> RunStatus {
  let mut combined = RunStatus::Unknown;

  for action in doc.fetch("actions").legacy_items() {
    match action.fetch(status_path).legacy_str().map(RunStatus::from_label) {
      Some(RunStatus::Failed) => return RunStatus::Failed,
      Some(RunStatus::Succeeded) => combined = RunStatus::Succeeded,
      _ => {}
    }
  }

  combined
}

fn collect_issues(doc: &Value, list_path: &str, path_prefix: &str) -> Vec<Issue> {
  doc
    .fetch(list_path)
    .legacy_items()
    .into_iter()
    .map(|summary| Issue {
      issue_type: summary.fetch("issueType").legacy_string(),
      message: summary.fetch("message").legacy_string().unwrap_or_default(),
      location: resolve_document_location(summary, path_prefix),
    })
    .collect()
}

fn collect_test_failures(doc: &Value, path_prefix: &str) -> Vec<TestFailure> {
  doc
    .fetch("issues.testFailureSummaries")
    .legacy_items()
    .into_iter()
    .map(|summary| TestFailure {
      test_name: summary.fetch("testCaseName").legacy_string().unwrap_or_default(),
      target_name: summary.fetch("producingTarget").legacy_string().unwrap_or_default(),
      failure_text: summary.fetch("message").legacy_string().unwrap_or_default(),
      location: resolve_document_location(summary, path_prefix),
    })
    .collect()
}

fn resolve_document_location(summary: &Value, path_prefix: &str) -> Option<crate::model::SourceLocation> {
  let url = summary.fetch("documentLocationInCreatingWorkspace.url").legacy_str()?;
  location::resolve(url, path_prefix)
}

fn collect_actions(doc: &Value) -> Vec<ActionRecord> {
  doc
    .fetch("actions")
    .legacy_items()
    .into_iter()
    .map(|action| ActionRecord {
      title: action.fetch("title").legacy_string(),
      scheme: action.fetch("schemeCommandName").legacy_string(),
      started_time: action.fetch("startedTime").legacy_str().and_then(parse_epoch),
      ended_time: action.fetch("endedTime").legacy_str().and_then(parse_epoch),
      destination: action.fetch("runDestination.displayName").legacy_string(),
      sdk_name: action.fetch("runDestination.targetSDKRecord.name").legacy_string(),
      sdk_version: action
        .fetch("runDestination.targetSDKRecord.operatingSystemVersion")
        .legacy_string(),
    })
    .collect()
}

/// Legacy timestamps are ISO strings like `2023-06-21T14:15:00.190+0000`
/// (offset without a colon, so plain RFC3339 parsing is tried second).
fn parse_epoch(iso: &str) -> Option<f64> {
  chrono::DateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f%z")
    .or_else(|_| chrono::DateTime::parse_from_rfc3339(iso))
    .ok()
    .map(|dt| dt.timestamp_millis() as f64 / 1000.0)
}
