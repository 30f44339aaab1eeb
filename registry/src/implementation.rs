//! Implementation types and the declarative facts attached to them.

use fibre_container::{InjectionKey, ServiceDescriptor};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::capability::{Capability, CapabilityInfo};
use crate::scope::ScopeKey;

/// Passed to a capability factory when a context constructs the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
  scope: ScopeKey,
}

impl Activation {
  pub fn new(scope: ScopeKey) -> Self {
    Self { scope }
  }

  pub fn scope(&self) -> &ScopeKey {
    &self.scope
  }

  /// The site being served, or `None` in the root context.
  pub fn site(&self) -> Option<&str> {
    self.scope.as_site()
  }
}

type DescriptorFactory = Arc<dyn Fn(InjectionKey, Activation) -> ServiceDescriptor + Send + Sync>;

/// One capability an implementation type provides, with the factory that
/// constructs it.
#[derive(Clone)]
pub struct ProvidedCapability {
  info: CapabilityInfo,
  descriptor: DescriptorFactory,
}

impl ProvidedCapability {
  pub fn info(&self) -> CapabilityInfo {
    self.info
  }

  /// A singleton binding of this capability for one target.
  pub(crate) fn descriptor(
    &self,
    implementation: InjectionKey,
    activation: Activation,
  ) -> ServiceDescriptor {
    (self.descriptor)(implementation, activation)
  }
}

impl fmt::Debug for ProvidedCapability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProvidedCapability")
      .field("info", &self.info)
      .finish_non_exhaustive()
  }
}

/// A concrete unit of behaviour and everything the registry needs to know
/// about it: which capabilities it provides, whether it supersedes another
/// implementation, whether it is deprecated, and which sites it serves.
///
/// ```
/// use fibre_registry::{capability, ImplementationType};
/// use std::sync::Arc;
///
/// pub trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
/// capability!(dyn Greeter => Scoped);
///
/// struct PoliteGreeter;
/// impl Greeter for PoliteGreeter {
///   fn greet(&self) -> String {
///     "Good day".to_string()
///   }
/// }
///
/// let greeter = ImplementationType::of::<PoliteGreeter>()
///   .provides::<dyn Greeter>(|_| Arc::new(PoliteGreeter))
///   .sites(["site1", "site2"]);
///
/// assert!(greeter.applies_to("site1"));
/// assert!(!greeter.applies_to("site3"));
/// ```
#[derive(Clone)]
pub struct ImplementationType {
  key: InjectionKey,
  capabilities: Vec<ProvidedCapability>,
  supersedes: Option<InjectionKey>,
  deprecated: bool,
  sites: Vec<String>,
  is_abstract: bool,
}

impl ImplementationType {
  pub fn of<T: Any>() -> Self {
    Self {
      key: InjectionKey::of::<T>(),
      capabilities: Vec::new(),
      supersedes: None,
      deprecated: false,
      sites: Vec::new(),
      is_abstract: false,
    }
  }

  // --- Declarations ---

  /// Declares that this type provides capability `C`, built by `factory`.
  pub fn provides<C: Capability + ?Sized>(
    mut self,
    factory: impl Fn(&Activation) -> Arc<C> + Send + Sync + 'static,
  ) -> Self {
    let factory = Arc::new(factory);
    let descriptor: DescriptorFactory =
      Arc::new(move |implementation: InjectionKey, activation: Activation| {
        let factory = Arc::clone(&factory);
        ServiceDescriptor::singleton::<C>(implementation, move || factory(&activation))
      });
    self.capabilities.push(ProvidedCapability {
      info: CapabilityInfo::of::<C>(),
      descriptor,
    });
    self
  }

  /// Marks this type as the replacement for `B`. `B` is removed from the
  /// candidates; nothing else in `B`'s lineage is.
  pub fn supersedes<B: Any>(mut self) -> Self {
    self.supersedes = Some(InjectionKey::of::<B>());
    self
  }

  pub fn deprecated(mut self) -> Self {
    self.deprecated = true;
    self
  }

  /// Restricts this type to the given sites. An empty list means all sites.
  pub fn sites<I, S>(mut self, sites: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.sites = sites.into_iter().map(Into::into).collect();
    self
  }

  /// Abstract types are visible to loaders but never become candidates.
  pub fn abstract_type(mut self) -> Self {
    self.is_abstract = true;
    self
  }

  // --- Facts ---

  pub fn key(&self) -> InjectionKey {
    self.key
  }

  pub fn name(&self) -> &'static str {
    self.key.type_name()
  }

  pub fn capabilities(&self) -> &[ProvidedCapability] {
    &self.capabilities
  }

  /// The implementation this type replaces, if any.
  pub fn superseded(&self) -> Option<InjectionKey> {
    self.supersedes
  }

  pub fn is_deprecated(&self) -> bool {
    self.deprecated
  }

  pub fn is_abstract(&self) -> bool {
    self.is_abstract
  }

  pub fn allowed_sites(&self) -> &[String] {
    &self.sites
  }

  pub fn applies_to(&self, site: &str) -> bool {
    self.sites.is_empty() || self.sites.iter().any(|allowed| allowed == site)
  }
}

impl fmt::Debug for ImplementationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ImplementationType")
      .field("name", &self.name())
      .field(
        "capabilities",
        &self
          .capabilities
          .iter()
          .map(|c| c.info.name())
          .collect::<Vec<_>>(),
      )
      .field("supersedes", &self.supersedes)
      .field("deprecated", &self.deprecated)
      .field("sites", &self.sites)
      .field("is_abstract", &self.is_abstract)
      .finish()
  }
}
