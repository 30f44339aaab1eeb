//! Capabilities: the abstract contracts implementations are bound to.

use fibre_container::InjectionKey;
use std::any::Any;

use crate::scope::ScopeType;

/// A contract the registry can bind, usually a trait object.
///
/// The scope classification is read once, when an implementation declares
/// that it provides the capability. Implement it with [`capability!`].
///
/// [`capability!`]: crate::capability!
pub trait Capability: Any + Send + Sync {
  const SCOPE: ScopeType;
}

/// A capability's identity together with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityInfo {
  key: InjectionKey,
  scope: ScopeType,
}

impl CapabilityInfo {
  pub fn of<C: Capability + ?Sized>() -> Self {
    Self {
      key: InjectionKey::of::<C>(),
      scope: C::SCOPE,
    }
  }

  pub fn key(&self) -> InjectionKey {
    self.key
  }

  pub fn name(&self) -> &'static str {
    self.key.type_name()
  }

  pub fn scope(&self) -> ScopeType {
    self.scope
  }
}

/// Declares the scope classification of a trait-object capability.
///
/// ```
/// use fibre_registry::capability;
///
/// pub trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// capability!(dyn Greeter => Scoped);
/// ```
///
/// Module paths and generic traits are accepted too, e.g.
/// `capability!(dyn ports::Repository<User> => Root)`.
///
/// The trait must have `Send + Sync` as supertraits.
#[macro_export]
macro_rules! capability {
  (dyn $trait_path:path => $scope:ident) => {
    impl $crate::Capability for dyn $trait_path {
      const SCOPE: $crate::ScopeType = $crate::ScopeType::$scope;
    }
  };
}
