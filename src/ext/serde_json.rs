// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Ergonomic nested JSON fetching via dotted paths, plus unwrapping of the legacy xcresulttool _value/_values wrappers
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper for typed extraction with defaults
// invariants: No panics; missing paths yield None; legacy numeric scalars arrive string-encoded and parse leniently
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Legacy scalar: descend into the `_value` wrapper and read it as a string.
  pub fn legacy_str(&self) -> Option<&'a str> {
    self.inner.and_then(|v| v.get("_value")).and_then(|v| v.as_str())
  }

  pub fn legacy_string(&self) -> Option<String> {
    self.legacy_str().map(|s| s.to_string())
  }

  /// Legacy count: `_value` holds integers as decimal strings ("3"), but be
  /// lenient and accept a plain JSON number too.
  pub fn legacy_u64(&self) -> Option<u64> {
    let wrapped = self.inner.and_then(|v| v.get("_value"))?;
    match wrapped {
      serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
      other => other.as_u64(),
    }
  }

  /// Legacy list: items of the `_values` wrapper, empty when any layer is absent.
  pub fn legacy_items(&self) -> Vec<&'a serde_json::Value> {
    self
      .inner
      .and_then(|v| v.get("_values"))
      .and_then(|v| v.as_array())
      .map(|a| a.iter().collect())
      .unwrap_or_default()
  }
}

/// Extension to fetch nested values via dotted paths like "actionResult.status".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
