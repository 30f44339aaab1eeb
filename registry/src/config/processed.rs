use fibre_container::DuplicatePolicy;
use std::collections::HashSet;

use crate::config::raw::ConfigRaw;
use crate::discovery::{Selection, FOUNDATION_UNIT};
use crate::error::{Error, Result};

/// A validated registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
  pub selection: Selection,
  pub foundation: Vec<String>,
  pub register_root: bool,
  /// Distinct, non-empty site names in declaration order.
  pub scopes: Vec<String>,
  pub duplicates: DuplicatePolicy,
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      selection: Selection::default(),
      foundation: vec![FOUNDATION_UNIT.to_string()],
      register_root: true,
      scopes: Vec::new(),
      duplicates: DuplicatePolicy::default(),
    }
  }
}

pub fn process_raw_config(raw: ConfigRaw) -> Result<RegistryConfig> {
  if raw.version != 1 {
    return Err(invalid(
      "version",
      format!("unsupported version {}, expected 1", raw.version),
    ));
  }

  let namespaces = non_empty_entries("namespaces", raw.namespaces)?;
  let prefixes = non_empty_entries("prefixes", raw.prefixes)?;
  let foundation = match raw.foundation {
    Some(units) => non_empty_entries("foundation", units)?,
    None => vec![FOUNDATION_UNIT.to_string()],
  };

  let mut seen = HashSet::new();
  let scopes = raw
    .scopes
    .into_iter()
    .flatten()
    .filter(|scope| !scope.is_empty() && seen.insert(scope.clone()))
    .collect();

  let duplicates = match raw.duplicates.as_deref() {
    None | Some("reject") => DuplicatePolicy::Reject,
    Some("last_wins") => DuplicatePolicy::LastWins,
    Some(other) => {
      return Err(invalid(
        "duplicates",
        format!("expected 'reject' or 'last_wins', got '{}'", other),
      ))
    }
  };

  Ok(RegistryConfig {
    selection: Selection {
      namespaces,
      prefixes,
    },
    foundation,
    register_root: raw.register_root,
    scopes,
    duplicates,
  })
}

fn non_empty_entries(field: &str, entries: Vec<String>) -> Result<Vec<String>> {
  if entries.iter().any(|entry| entry.trim().is_empty()) {
    return Err(invalid(field, "entries must not be empty".to_string()));
  }
  Ok(entries)
}

fn invalid(field: &str, message: String) -> Error {
  Error::InvalidConfigValue {
    field: field.to_string(),
    message,
  }
}
