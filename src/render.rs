// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render the canonical metrics and action records into the markdown summary blocks
// role: rendering/markdown
// inputs: RunSummary, GenerationSettings (explicit parameters)
// outputs: One markdown string; each block appended only when its toggle is set
// invariants: Prose, build table, test table templates are a compatibility contract (emoji, column order) and must not drift; counts render as plain integers
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write as _;

use crate::model::{ActionRecord, RunSummary};
use crate::settings::GenerationSettings;

/// Render the enabled summary blocks in fixed order: prose, build table,
/// test table, then the optional SDK and timing sections.
pub fn generate_summary(run: &RunSummary, settings: &GenerationSettings) -> String {
  let metrics = &run.metrics;
  let mut out = String::new();

  if settings.summary {
    let _ = write!(
      out,
      "\n## Summary\n\u{1f528} Build finished with **{}** Errors and **{}** Warnings\n\u{1f9ea} {}/{} tests passed\n",
      metrics.errors,
      metrics.warnings,
      metrics.tests_passed(),
      metrics.tests_total
    );
  }

  if settings.build_summary_table {
    let _ = write!(
      out,
      "\n\n## Build\n|Errors \u{26d4}\u{fe0f}| Warnings \u{26a0}\u{fe0f}|\n|:---------------|:----------------|\n| {} | {} |\n",
      metrics.errors, metrics.warnings
    );
  }

  if settings.test_summary_table {
    let _ = write!(
      out,
      "\n\n## Tests\n|Tests Total \u{1f9ea}|Tests Passed \u{2705}|Tests Failed \u{26d4}\u{fe0f}|\n|:---------------|:----------------|:------------|\n| {} | {} | {} |\n",
      metrics.tests_total,
      metrics.tests_passed(),
      metrics.tests_failed
    );
  }

  if settings.show_sdk_info {
    out.push_str(&sdk_section(&run.actions));
  }

  if settings.timing_summary {
    out.push_str(&timing_section(&run.actions));
  }

  out
}

/// One row per action that names a destination or SDK; empty string when the
/// bundle carries none (older bundles, partial compact data).
fn sdk_section(actions: &[ActionRecord]) -> String {
  let rows: Vec<String> = actions
    .iter()
    .filter(|a| a.destination.is_some() || a.sdk_name.is_some())
    .map(|a| {
      let sdk = match (&a.sdk_name, &a.sdk_version) {
        (Some(name), Some(version)) if !name.ends_with(version.as_str()) => {
          format!("{} {}", name, version)
        }
        (Some(name), _) => name.clone(),
        (None, Some(version)) => version.clone(),
        (None, None) => "-".to_string(),
      };
      format!("| {} | {} |\n", a.destination.as_deref().unwrap_or("-"), sdk)
    })
    .collect();

  if rows.is_empty() {
    return String::new();
  }

  format!(
    "\n\n## SDK\n|Destination \u{1f4f1}| SDK \u{1f6e0}\u{fe0f}|\n|:---------------|:----------------|\n{}",
    rows.concat()
  )
}

fn timing_section(actions: &[ActionRecord]) -> String {
  let mut lines = String::new();

  for action in actions {
    let (Some(start), Some(end)) = (action.started_time, action.ended_time) else {
      continue;
    };
    let elapsed = (end - start).max(0.0);
    let _ = writeln!(
      lines,
      "\u{23f1}\u{fe0f} {} took {:.1}s",
      action.title.as_deref().unwrap_or("Run"),
      elapsed
    );
  }

  if lines.is_empty() {
    return String::new();
  }

  format!("\n\n## Timing\n{}", lines)
}
