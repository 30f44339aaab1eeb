use fibre_container::{BuildError, ResolveError};
use thiserror::Error;

use crate::scope::ScopeKey;

/// The main error type for `fibre_registry`.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unit '{0}' is not known to the loader")]
  UnitNotFound(String),

  #[error("failed to load unit '{unit}': {reason}")]
  UnitLoad { unit: String, reason: String },

  /// No resolution context has been built for the scope. Distinct from
  /// `CapabilityNotBound` so callers can tell "not onboarded yet" apart.
  #[error("scope '{0}' is not registered")]
  ScopeNotRegistered(String),

  #[error("capability {capability} is not bound in scope '{scope}'")]
  CapabilityNotBound {
    scope: String,
    capability: &'static str,
  },

  #[error("capability {capability} in scope '{scope}' is bound to both {existing} and {duplicate}")]
  DuplicateBinding {
    scope: String,
    capability: &'static str,
    existing: &'static str,
    duplicate: &'static str,
  },

  /// Some pending targets failed to build. Every other pending target was
  /// still built; `built` counts those.
  #[error("{} scope(s) failed to build, {built} built", .failures.len())]
  Build { built: usize, failures: Vec<Error> },

  #[error("Configuration file not found: {0}")]
  ConfigNotFound(String),

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },
}

impl Error {
  pub(crate) fn from_build(scope: &ScopeKey, err: BuildError) -> Self {
    match err {
      BuildError::DuplicateBinding {
        service,
        existing,
        duplicate,
      } => Error::DuplicateBinding {
        scope: scope.to_string(),
        capability: service.type_name(),
        existing: existing.type_name(),
        duplicate: duplicate.type_name(),
      },
    }
  }

  pub(crate) fn from_resolve(scope: &ScopeKey, err: ResolveError) -> Self {
    match err {
      ResolveError::NotBound(key) => Error::CapabilityNotBound {
        scope: scope.to_string(),
        capability: key.type_name(),
      },
    }
  }
}

/// A specialized `Result` type for `fibre_registry` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
