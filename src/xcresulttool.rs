// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Invoke xcresulttool and hand raw document text to the normalizer
// role: io/loader
// inputs: Bundle path, schema variant; optional XCRESULT_REPORT_TOOL override for the tool binary
// outputs: RawBundle with per-query text; compact queries degrade to None on failure
// side_effects: Spawns subprocesses (xcrun xcresulttool); the compact queries run as a parallel fan-out
// invariants: The three compact queries are independent reads of the same immutable bundle and are joined all-or-nothing
// errors: Legacy invocation surfaces command + stderr; compact sub-queries are best-effort
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::process::Command;

use anyhow::{Context, Result};

use crate::normalize::{RawBundle, SchemaVariant};

pub fn load_bundle(bundle_path: &str, variant: SchemaVariant) -> Result<RawBundle> {
  match variant {
    SchemaVariant::Legacy => {
      let invocation = run_tool(&["get", "--legacy", "--format", "json", "--path", bundle_path])?;
      Ok(RawBundle::Legacy { invocation })
    }
    SchemaVariant::Compact => {
      let (build, (tests, detail)) = rayon::join(
        || try_query(&["get", "build-results", "--path", bundle_path, "--compact"]),
        || {
          rayon::join(
            || try_query(&["get", "test-results", "summary", "--path", bundle_path, "--compact"]),
            || try_query(&["get", "test-results", "tests", "--path", bundle_path, "--compact"]),
          )
        },
      );
      Ok(RawBundle::Compact { build, tests, detail })
    }
  }
}

/// Best-effort query: a missing sub-document still yields a usable partial
/// summary downstream (e.g. build results without test results).
fn try_query(args: &[&str]) -> Option<String> {
  run_tool(args).ok().filter(|text| !text.is_empty())
}

fn run_tool(args: &[&str]) -> Result<String> {
  // Tests (and exotic setups) point XCRESULT_REPORT_TOOL at a replacement
  // binary which receives the xcresulttool arguments directly.
  let out = match std::env::var("XCRESULT_REPORT_TOOL") {
    Ok(tool) if !tool.trim().is_empty() => Command::new(tool.trim()).args(args).output(),
    _ => Command::new("xcrun").arg("xcresulttool").args(args).output(),
  }
  .with_context(|| format!("spawning xcresulttool {:?}", args))?;

  if out.status.success() {
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
  } else {
    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::bail!("xcresulttool {:?} failed: {}", args, stderr)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[cfg(unix)]
  fn write_stub(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-xcresulttool");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
  }

  #[test]
  #[serial]
  #[cfg(unix)]
  fn compact_load_collects_all_three_queries() {
    let td = tempfile::TempDir::new().unwrap();
    let stub = write_stub(td.path(), "echo '{\"queried\": true}'");
    std::env::set_var("XCRESULT_REPORT_TOOL", &stub);

    let bundle = load_bundle("Results.xcresult", SchemaVariant::Compact).unwrap();
    match bundle {
      RawBundle::Compact { build, tests, detail } => {
        assert!(build.is_some() && tests.is_some() && detail.is_some());
        assert_eq!(build.unwrap(), "{\"queried\": true}");
      }
      other => panic!("expected compact bundle, got {other:?}"),
    }

    std::env::remove_var("XCRESULT_REPORT_TOOL");
  }

  #[test]
  #[serial]
  #[cfg(unix)]
  fn failing_compact_queries_degrade_to_none() {
    let td = tempfile::TempDir::new().unwrap();
    let stub = write_stub(td.path(), "exit 1");
    std::env::set_var("XCRESULT_REPORT_TOOL", &stub);

    let bundle = load_bundle("Results.xcresult", SchemaVariant::Compact).unwrap();
    match bundle {
      RawBundle::Compact { build, tests, detail } => {
        assert!(build.is_none() && tests.is_none() && detail.is_none());
      }
      other => panic!("expected compact bundle, got {other:?}"),
    }

    std::env::remove_var("XCRESULT_REPORT_TOOL");
  }

  #[test]
  #[serial]
  #[cfg(unix)]
  fn failing_legacy_invocation_is_an_error() {
    let td = tempfile::TempDir::new().unwrap();
    let stub = write_stub(td.path(), "echo 'no such bundle' >&2; exit 64");
    std::env::set_var("XCRESULT_REPORT_TOOL", &stub);

    let err = load_bundle("Results.xcresult", SchemaVariant::Legacy).unwrap_err();
    assert!(format!("{err:#}").contains("xcresulttool"));

    std::env::remove_var("XCRESULT_REPORT_TOOL");
  }
}
