use thiserror::Error;

use crate::core::InjectionKey;

/// Errors raised while turning a `ServiceCollection` into a `ServiceProvider`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// Two different implementations were registered for the same service
  /// under `DuplicatePolicy::Reject`.
  #[error("service {service} is bound to both {existing} and {duplicate}")]
  DuplicateBinding {
    service: InjectionKey,
    existing: InjectionKey,
    duplicate: InjectionKey,
  },
}

/// Errors raised while resolving a service from a built provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  #[error("no binding for service {0}")]
  NotBound(InjectionKey),
}
