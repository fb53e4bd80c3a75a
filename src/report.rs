// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Derive the flat metrics view and the binary check conclusion from a canonical RunSummary
// role: processing/verdict
// outputs: Metrics (with derived passed count) and Conclusion
// invariants: Conclusion is a strict OR of failure signals; unknown statuses alone resolve to success
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{Conclusion, Metrics, RunStatus, RunSummary};

/// Pure arithmetic over the canonical model; absent counts were already
/// defaulted to 0 at normalization.
pub fn extract_metrics(run: &RunSummary) -> Metrics {
  run.metrics.clone()
}

/// Failure iff the build failed, the test run failed, or any error was
/// reported. There is no partial or degraded verdict.
pub fn resolve_conclusion(run: &RunSummary) -> Conclusion {
  let m = &run.metrics;
  if m.build_status == RunStatus::Failed || m.test_status == RunStatus::Failed || m.errors > 0 {
    Conclusion::Failure
  } else {
    Conclusion::Success
  }
}
