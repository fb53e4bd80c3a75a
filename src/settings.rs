// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Generation toggles for summary sections and annotation kinds, plus the GitHub Actions INPUT_* env glue
// role: config/settings
// inputs: CLI flags via cli::normalize, or INPUT_* env vars when running as an action step
// outputs: Read-only GenerationSettings consumed by the render/annotate layers as an explicit parameter
// invariants: Core logic never reads env; only from_action_env/action_input touch the process environment
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

/// Eight independent output toggles. Defaults are all-on; the action wrapper
/// declares every input explicitly, so in that mode a flag is on only when
/// its input is the literal string "true".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
  pub build_summary_table: bool,
  pub test_summary_table: bool,
  pub test_failure_annotations: bool,
  pub summary: bool,
  pub warning_annotations: bool,
  pub error_annotations: bool,
  pub show_sdk_info: bool,
  pub timing_summary: bool,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    GenerationSettings {
      build_summary_table: true,
      test_summary_table: true,
      test_failure_annotations: true,
      summary: true,
      warning_annotations: true,
      error_annotations: true,
      show_sdk_info: true,
      timing_summary: true,
    }
  }
}

impl GenerationSettings {
  /// Settings as declared by the workflow (`INPUT_<NAME>` env vars, the way
  /// the actions runner passes inputs down).
  pub fn from_action_env() -> GenerationSettings {
    GenerationSettings {
      build_summary_table: action_flag("buildSummaryTable"),
      test_summary_table: action_flag("testSummaryTable"),
      test_failure_annotations: action_flag("testFailureAnnotations"),
      summary: action_flag("summary"),
      warning_annotations: action_flag("warningAnnotations"),
      error_annotations: action_flag("errorAnnotations"),
      show_sdk_info: action_flag("showSDKInfo"),
      timing_summary: action_flag("timingSummary"),
    }
  }
}

/// Raw action input, `None` when unset or empty.
pub fn action_input(name: &str) -> Option<String> {
  let key = format!("INPUT_{}", name.to_uppercase());
  match std::env::var(key) {
    Ok(v) if !v.trim().is_empty() => Some(v),
    _ => None,
  }
}

fn action_flag(name: &str) -> bool {
  action_input(name).as_deref() == Some("true")
}
