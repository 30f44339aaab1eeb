use serde::Deserialize;

// --- Top Level Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigRaw {
  #[serde(default = "default_version")]
  pub version: u32,
  /// Units to scan. When empty, `prefixes` select units instead.
  #[serde(default)]
  pub namespaces: Vec<String>,
  #[serde(default)]
  pub prefixes: Vec<String>,
  /// Replaces the default foundation units when present.
  #[serde(default)]
  pub foundation: Option<Vec<String>>,
  #[serde(default = "default_register_root")]
  pub register_root: bool,
  /// Sites to register. Nulls and empty strings are skipped.
  #[serde(default)]
  pub scopes: Vec<Option<String>>,
  /// Expected values: "reject" or "last_wins".
  #[serde(default)]
  pub duplicates: Option<String>,
}

fn default_version() -> u32 {
  1
}

fn default_register_root() -> bool {
  true
}
