// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalize either xcresulttool schema variant (legacy wrapped, compact flat) into one canonical RunSummary
// role: parsing/normalizer
// inputs: RawBundle (variant-tagged raw JSON text), path prefix for location resolution
// outputs: RunSummary; NormalizeError::MalformedDocument only when supplied text is not JSON at all
// invariants: Absent sub-documents and fields degrade to defaults (0 counts, unknown statuses, empty lists); downstream code is variant-agnostic
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod compact;
pub mod legacy;

use crate::model::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
  /// Flat documents from `xcresulttool get build-results` / `get test-results` (Xcode 16+).
  #[default]
  Compact,
  /// The wrapped `_type`/`_value` ActionsInvocationRecord from `xcresulttool get --format json`.
  Legacy,
}

/// Raw text as handed over by the loader boundary. The compact variant is
/// three independent documents; any of them may be missing when its
/// subprocess query failed (best-effort partial data).
#[derive(Debug, Clone)]
pub enum RawBundle {
  Legacy {
    invocation: String,
  },
  Compact {
    build: Option<String>,
    tests: Option<String>,
    detail: Option<String>,
  },
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
  #[error("malformed result document: {0}")]
  MalformedDocument(#[from] serde_json::Error),
}

/// Parse and normalize one bundle. This is the only place schema quirks are
/// allowed to exist; everything after it consumes the canonical model.
pub fn normalize(bundle: &RawBundle, path_prefix: &str) -> Result<RunSummary, NormalizeError> {
  match bundle {
    RawBundle::Legacy { invocation } => {
      let doc: serde_json::Value = serde_json::from_str(invocation)?;
      Ok(legacy::normalize(&doc, path_prefix))
    }
    RawBundle::Compact { build, tests, detail } => compact::normalize(
      build.as_deref(),
      tests.as_deref(),
      detail.as_deref(),
      path_prefix,
    ),
  }
}
