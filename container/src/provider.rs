//! The immutable, built side of the container.

use crate::core::{InjectionKey, Lifetime, Provider};
use crate::error::ResolveError;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub(crate) struct Registration {
  pub(crate) implementation: InjectionKey,
  pub(crate) provider: Provider,
}

/// A built, read-only resolution context.
///
/// The set of bindings is fixed at build time. Singleton services are created
/// lazily on first resolution, exactly once per provider, even under
/// concurrent access; every later resolution returns the same instance.
pub struct ServiceProvider {
  registrations: HashMap<InjectionKey, Registration>,
}

impl ServiceProvider {
  pub(crate) fn new(registrations: HashMap<InjectionKey, Registration>) -> Self {
    Self { registrations }
  }

  /// Resolves a service, returning `None` if it has no binding.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self
      .registrations
      .get(&InjectionKey::of::<T>())
      .and_then(|registration| registration.provider.resolve::<T>())
  }

  /// Resolves a service, failing with `ResolveError::NotBound` if it has no binding.
  pub fn require<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>, ResolveError> {
    self
      .get::<T>()
      .ok_or_else(|| ResolveError::NotBound(InjectionKey::of::<T>()))
  }

  pub fn contains<T: ?Sized + Any>(&self) -> bool {
    self.registrations.contains_key(&InjectionKey::of::<T>())
  }

  /// The implementation bound to service `T`, if any.
  pub fn implementation_of<T: ?Sized + Any>(&self) -> Option<InjectionKey> {
    self
      .registrations
      .get(&InjectionKey::of::<T>())
      .map(|registration| registration.implementation)
  }

  pub fn lifetime_of<T: ?Sized + Any>(&self) -> Option<Lifetime> {
    self
      .registrations
      .get(&InjectionKey::of::<T>())
      .map(|registration| registration.provider.lifetime())
  }

  /// Every service type bound in this provider, in no particular order.
  pub fn services(&self) -> impl Iterator<Item = InjectionKey> + '_ {
    self.registrations.keys().copied()
  }

  pub fn len(&self) -> usize {
    self.registrations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registrations.is_empty()
  }
}

impl fmt::Debug for ServiceProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(
        self
          .registrations
          .iter()
          .map(|(service, registration)| (service, &registration.implementation)),
      )
      .finish()
  }
}
