// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the canonical run model (metrics, issues, actions) and the GitHub-facing output types
// role: model/types
// outputs: Serializable structs with stable field names; both schema variants converge onto these shapes
// invariants: tests_passed is derived, never stored; annotation lines are 1-based; canonical values are immutable after normalization
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Build or test outcome as reported by the bundle. Absent upstream status
/// maps to `Unknown`, which alone never fails a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
  #[default]
  Unknown,
  Succeeded,
  Failed,
}

impl RunStatus {
  /// Map an upstream status label to a `RunStatus`. The compact schema says
  /// "failed"/"succeeded" for builds but "Failed"/"Passed" for test runs, so
  /// matching is case-insensitive and accepts both success spellings.
  pub fn from_label(label: &str) -> RunStatus {
    if label.eq_ignore_ascii_case("failed") {
      RunStatus::Failed
    } else if label.eq_ignore_ascii_case("succeeded") || label.eq_ignore_ascii_case("passed") {
      RunStatus::Succeeded
    } else {
      RunStatus::Unknown
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
  pub tests_total: u64,
  pub tests_failed: u64,
  pub tests_skipped: u64,
  pub expected_failures: u64,
  pub warnings: u64,
  pub errors: u64,
  pub build_status: RunStatus,
  pub test_status: RunStatus,
}

impl Metrics {
  /// Derived, never stored. Upstream is trusted to keep failed <= total, but
  /// the subtraction saturates so a lying bundle cannot underflow.
  pub fn tests_passed(&self) -> u64 {
    self.tests_total.saturating_sub(self.tests_failed)
  }
}

/// A repository-relative source position. Lines are 1-based; both are absent
/// when the upstream document location carried no line keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
  pub file: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_line: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<String>,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFailure {
  pub test_name: String,
  pub target_name: String,
  pub failure_text: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IssueSet {
  pub test_failures: Vec<TestFailure>,
  pub warnings: Vec<Issue>,
  pub errors: Vec<Issue>,
}

/// One build/test invocation inside the bundle: scheme, destination, SDK and
/// wall-clock bounds. Everything is optional; older bundles omit most of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionRecord {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scheme: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub started_time: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ended_time: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub destination: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sdk_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sdk_version: Option<String>,
}

/// The canonical result of normalizing one bundle, built once per invocation
/// and read-only afterwards. Both schema variants produce this exact shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
  pub metrics: Metrics,
  pub issues: IssueSet,
  pub actions: Vec<ActionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
  Notice,
  Warning,
  Failure,
}

/// One GitHub Check Run annotation. Field names match the REST payload
/// verbatim so the sequence serializes straight into the `output.annotations`
/// array. Lines are 1-based and always present; GitHub rejects nulls there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
  pub path: String,
  pub start_line: u32,
  pub end_line: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_column: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_column: Option<u32>,
  pub annotation_level: AnnotationLevel,
  pub message: String,
  pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
  Success,
  Failure,
}

impl Conclusion {
  pub fn as_str(&self) -> &'static str {
    match self {
      Conclusion::Success => "success",
      Conclusion::Failure => "failure",
    }
  }
}

impl std::fmt::Display for Conclusion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The three artifacts handed to the Check-creation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
  pub title: String,
  pub summary: String,
  pub annotations: Vec<Annotation>,
}
