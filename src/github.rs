// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Publish the rendered report as a completed GitHub Check Run
// role: io/github
// inputs: CheckOutput + Conclusion; repo, sha and token come from the standard actions env (GITHUB_REPOSITORY, GITHUB_SHA, GITHUB_EVENT_*, GITHUB_TOKEN/GH_TOKEN)
// outputs: POST /repos/{owner}/{repo}/check-runs; with XCR_TEST_CHECK_FILE set the payload is written to that file instead
// side_effects: Network call to api.github.com (or file write under the test seam)
// invariants: Pull request events report against the PR head sha, never the synthetic merge sha
// errors: Missing repo/sha/token and non-2xx API responses surface with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::ext::serde_json::JsonFetch;
use crate::model::{CheckOutput, Conclusion};

/// Create a completed check run for the current commit. Returns the API
/// response body (or the payload itself under the file seam) for logging.
pub fn publish_check(output: &CheckOutput, conclusion: Conclusion) -> Result<Value> {
  let sha = resolve_head_sha().context("no commit sha available (GITHUB_SHA unset?)")?;
  let payload = build_payload(output, conclusion, &sha);

  // Test seam: dump the payload instead of talking to the API.
  if let Ok(path) = std::env::var("XCR_TEST_CHECK_FILE") {
    if !path.trim().is_empty() {
      let text = serde_json::to_string_pretty(&payload)?;
      std::fs::write(&path, text).with_context(|| format!("writing check payload to {path}"))?;
      return Ok(payload);
    }
  }

  let repo = std::env::var("GITHUB_REPOSITORY").context("GITHUB_REPOSITORY not set")?;
  let token = discover_token().context("no GitHub token found (GITHUB_TOKEN or GH_TOKEN)")?;
  let url = format!("https://api.github.com/repos/{repo}/check-runs");

  let response: Value = ureq::post(&url)
    .set("Accept", "application/vnd.github+json")
    .set("Authorization", &format!("Bearer {token}"))
    .set("User-Agent", "xcresult-report")
    .send_json(payload)
    .with_context(|| format!("creating check run on {repo}"))?
    .into_json()
    .context("decoding check-run response")?;

  Ok(response)
}

fn build_payload(output: &CheckOutput, conclusion: Conclusion, sha: &str) -> Value {
  json!({
    "name": output.title,
    "head_sha": sha,
    "status": "completed",
    "conclusion": conclusion.as_str(),
    "output": output,
  })
}

/// On pull_request events GITHUB_SHA points at the ephemeral merge commit;
/// annotations must land on the PR head instead, read from the event payload.
fn resolve_head_sha() -> Option<String> {
  let event_name = std::env::var("GITHUB_EVENT_NAME").unwrap_or_default();
  if event_name.starts_with("pull_request") {
    if let Some(sha) = pull_request_head_sha() {
      return Some(sha);
    }
  }
  std::env::var("GITHUB_SHA").ok().filter(|s| !s.trim().is_empty())
}

fn pull_request_head_sha() -> Option<String> {
  let path = std::env::var("GITHUB_EVENT_PATH").ok()?;
  let text = std::fs::read_to_string(path).ok()?;
  let event: Value = serde_json::from_str(&text).ok()?;
  event.fetch("pull_request.head.sha").to::<String>()
}

fn discover_token() -> Option<String> {
  for key in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(v) = std::env::var(key) {
      if !v.trim().is_empty() {
        return Some(v);
      }
    }
  }
  None
}
