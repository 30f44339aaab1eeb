// src/config/mod.rs
// Registry configuration: YAML is read into `raw` structs, then validated
// into a `RegistryConfig`.

pub mod processed;
pub mod raw;

pub use processed::RegistryConfig;

use std::env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use processed::process_raw_config;
use raw::ConfigRaw;

const DEFAULT_CONFIG_BASE_NAME: &str = "fibre_registry";
const DEFAULT_CONFIG_EXTENSION: &str = "yaml";

impl RegistryConfig {
  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    let raw: ConfigRaw =
      serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
    process_raw_config(raw)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let file = File::open(path)?;
    let reader = io::BufReader::new(file);
    let raw: ConfigRaw =
      serde_yaml::from_reader(reader).map_err(|e| Error::ConfigParse(e.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded registry configuration");
    process_raw_config(raw)
  }
}

/// Finds the configuration file in the working directory, preferring an
/// environment-specific file (`fibre_registry.<env>.yaml`) over the plain one.
///
/// The environment comes from `environment_suffix`, then `FIBRE_ENV`, then
/// `APP_ENV`.
pub fn find_config_file(environment_suffix: Option<&str>) -> Result<PathBuf> {
  find_config_file_in(&[PathBuf::from(".")], environment_suffix)
}

/// Like [`find_config_file`], searching `search_dirs` in order. Within a
/// directory the environment-specific file wins.
pub fn find_config_file_in(
  search_dirs: &[PathBuf],
  environment_suffix: Option<&str>,
) -> Result<PathBuf> {
  let environment = environment_suffix
    .map(str::to_owned)
    .or_else(|| env::var("FIBRE_ENV").ok())
    .or_else(|| env::var("APP_ENV").ok());
  let candidates = config_file_names(environment.as_deref());

  search_dirs
    .iter()
    .flat_map(|dir| candidates.iter().map(move |name| dir.join(name)))
    .find(|path| path.is_file())
    .ok_or_else(|| {
      Error::ConfigNotFound(format!(
        "none of {:?} exists in {:?} (environment: {:?})",
        candidates, search_dirs, environment
      ))
    })
}

/// Candidate file names, most specific first.
fn config_file_names(environment: Option<&str>) -> Vec<String> {
  let plain = format!("{}.{}", DEFAULT_CONFIG_BASE_NAME, DEFAULT_CONFIG_EXTENSION);
  match environment.filter(|env| !env.is_empty()) {
    Some(env) => vec![
      format!("{}.{}.{}", DEFAULT_CONFIG_BASE_NAME, env, DEFAULT_CONFIG_EXTENSION),
      plain,
    ],
    None => vec![plain],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_config_file_names() {
    assert_eq!(
      config_file_names(Some("prod")),
      vec!["fibre_registry.prod.yaml", "fibre_registry.yaml"]
    );
    assert_eq!(config_file_names(Some("")), vec!["fibre_registry.yaml"]);
    assert_eq!(config_file_names(None), vec!["fibre_registry.yaml"]);
  }
}
