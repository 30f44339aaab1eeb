//! Core, mostly non-public data structures for the container.

use once_cell::sync::OnceCell;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a service or implementation type.
///
/// Equality and hashing only consider the `TypeId`; the type name is kept
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct InjectionKey {
  type_id: TypeId,
  type_name: &'static str,
}

impl InjectionKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl PartialEq for InjectionKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for InjectionKey {}

impl Hash for InjectionKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for InjectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.type_name)
  }
}

impl fmt::Display for InjectionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.type_name)
  }
}

/// How a provider hands out instances of its service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
  /// One instance per built provider, created on first resolution.
  Singleton,
  /// A fresh instance on every resolution.
  Transient,
}

/// Type-erased factory. The returned box always holds an `Arc<T>` for the
/// service type `T` it was registered under.
pub(crate) type Factory = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

pub(crate) enum Provider {
  Singleton {
    cell: OnceCell<Box<dyn Any + Send + Sync>>,
    factory: Factory,
  },
  Transient {
    factory: Factory,
  },
}

impl Provider {
  pub(crate) fn new(lifetime: Lifetime, factory: Factory) -> Self {
    match lifetime {
      Lifetime::Singleton => Provider::Singleton {
        cell: OnceCell::new(),
        factory,
      },
      Lifetime::Transient => Provider::Transient { factory },
    }
  }

  pub(crate) fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    match self {
      Provider::Singleton { cell, factory } => cell
        .get_or_init(|| factory())
        .downcast_ref::<Arc<T>>()
        .cloned(),
      Provider::Transient { factory } => factory()
        .downcast::<Arc<T>>()
        .ok()
        .map(|arc_in_a_box| *arc_in_a_box),
    }
  }

  pub(crate) fn lifetime(&self) -> Lifetime {
    match self {
      Provider::Singleton { .. } => Lifetime::Singleton,
      Provider::Transient { .. } => Lifetime::Transient,
    }
  }
}
