//! The mutable side of the container: descriptors accumulated before a build.

use crate::core::{Factory, InjectionKey, Lifetime, Provider};
use crate::error::BuildError;
use crate::provider::{Registration, ServiceProvider};
use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What `ServiceCollection::build` does when one service has been bound to
/// more than one implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
  /// Fail the build with `BuildError::DuplicateBinding`.
  #[default]
  Reject,
  /// Keep the implementation registered last.
  LastWins,
}

/// A single binding of a service type to the implementation that provides it.
#[derive(Clone)]
pub struct ServiceDescriptor {
  service: InjectionKey,
  implementation: InjectionKey,
  lifetime: Lifetime,
  factory: Factory,
}

impl ServiceDescriptor {
  /// Binds service `I` to `implementation` with one instance per provider.
  pub fn singleton<I: ?Sized + Any + Send + Sync>(
    implementation: InjectionKey,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) -> Self {
    Self::with_lifetime(implementation, Lifetime::Singleton, factory)
  }

  /// Binds service `I` to `implementation` with a new instance per resolution.
  pub fn transient<I: ?Sized + Any + Send + Sync>(
    implementation: InjectionKey,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) -> Self {
    Self::with_lifetime(implementation, Lifetime::Transient, factory)
  }

  /// Binds service `I` to an already constructed value.
  pub fn instance<I: ?Sized + Any + Send + Sync>(
    implementation: InjectionKey,
    instance: Arc<I>,
  ) -> Self {
    Self::singleton(implementation, move || Arc::clone(&instance))
  }

  fn with_lifetime<I: ?Sized + Any + Send + Sync>(
    implementation: InjectionKey,
    lifetime: Lifetime,
    factory: impl Fn() -> Arc<I> + Send + Sync + 'static,
  ) -> Self {
    Self {
      service: InjectionKey::of::<I>(),
      implementation,
      lifetime,
      factory: Arc::new(move || -> Box<dyn Any + Send + Sync> { Box::new(factory()) }),
    }
  }

  pub fn service(&self) -> InjectionKey {
    self.service
  }

  pub fn implementation(&self) -> InjectionKey {
    self.implementation
  }

  pub fn lifetime(&self) -> Lifetime {
    self.lifetime
  }
}

impl fmt::Debug for ServiceDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceDescriptor")
      .field("service", &self.service)
      .field("implementation", &self.implementation)
      .field("lifetime", &self.lifetime)
      .finish_non_exhaustive()
  }
}

/// An ordered, open accumulator of service bindings.
///
/// A collection is consumed by [`ServiceCollection::build`], which produces
/// an immutable [`ServiceProvider`]. Registering the same implementation for
/// the same service more than once is harmless; only the first registration
/// is kept.
#[derive(Default, Clone)]
pub struct ServiceCollection {
  descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
  /// Creates a new, empty `ServiceCollection`.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
    self.descriptors.push(descriptor);
    self
  }

  // --- Closure Registration ---
  // The factory's own type stands in for the implementation identity, so
  // two registrations through the same closure count as one implementation.

  pub fn add_singleton<I, F>(&mut self, factory: F) -> &mut Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn() -> Arc<I> + Send + Sync + 'static,
  {
    self.add(ServiceDescriptor::singleton(InjectionKey::of::<F>(), factory))
  }

  pub fn add_transient<I, F>(&mut self, factory: F) -> &mut Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn() -> Arc<I> + Send + Sync + 'static,
  {
    self.add(ServiceDescriptor::transient(InjectionKey::of::<F>(), factory))
  }

  /// Binds `T` to a value that already exists.
  pub fn add_instance<T: Any + Send + Sync>(&mut self, instance: T) -> &mut Self {
    self.add(ServiceDescriptor::instance(InjectionKey::of::<T>(), Arc::new(instance)))
  }

  // --- Queries ---

  pub fn contains<I: ?Sized + Any>(&self) -> bool {
    self.contains_key(&InjectionKey::of::<I>())
  }

  pub fn contains_key(&self, service: &InjectionKey) -> bool {
    self.descriptors.iter().any(|d| d.service == *service)
  }

  pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
    self.descriptors.iter()
  }

  pub fn len(&self) -> usize {
    self.descriptors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.descriptors.is_empty()
  }

  /// Consumes the collection and builds an immutable provider.
  pub fn build(self, policy: DuplicatePolicy) -> Result<ServiceProvider, BuildError> {
    let mut registrations: HashMap<InjectionKey, Registration> =
      HashMap::with_capacity(self.descriptors.len());

    for descriptor in self.descriptors {
      let registration = Registration {
        implementation: descriptor.implementation,
        provider: Provider::new(descriptor.lifetime, descriptor.factory),
      };

      match registrations.entry(descriptor.service) {
        Entry::Vacant(slot) => {
          slot.insert(registration);
        }
        Entry::Occupied(mut slot) => {
          if slot.get().implementation == registration.implementation {
            continue;
          }
          match policy {
            DuplicatePolicy::Reject => {
              return Err(BuildError::DuplicateBinding {
                service: descriptor.service,
                existing: slot.get().implementation,
                duplicate: registration.implementation,
              });
            }
            DuplicatePolicy::LastWins => {
              slot.insert(registration);
            }
          }
        }
      }
    }

    Ok(ServiceProvider::new(registrations))
  }
}

impl fmt::Debug for ServiceCollection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.descriptors.iter()).finish()
  }
}
