//! The registry: per-target binding collections and the cache of built
//! resolution contexts.

use dashmap::DashMap;
use fibre_container::{
  DuplicatePolicy, InjectionKey, ServiceCollection, ServiceDescriptor, ServiceProvider,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::binder::{bind_root, bind_scope};
use crate::capability::Capability;
use crate::config::RegistryConfig;
use crate::discovery::{Discovery, InventoryLoader, Selection, UnitLoader};
use crate::error::{Error, Result};
use crate::implementation::ImplementationType;
use crate::log::Log;
use crate::overrides::resolve_overrides;
use crate::scope::{ScopeKey, ScopeStatus, SiteScope, TenantScope};

/// A target's binding collection, until it has been built.
enum Slot {
  Open(ServiceCollection),
  Built,
}

/// A multi-tenant capability registry.
///
/// Owns one binding collection per target (the root, or a site) and, once
/// built, one immutable resolution context per target. Create one per
/// process and share it by reference or `Arc`; every method takes `&self`
/// and is safe to call from any thread.
///
/// ```
/// use fibre_registry::{capability, Catalog, ImplementationType, Registry, ScopeKey};
/// use std::sync::Arc;
///
/// pub trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
/// capability!(dyn Greeter => Scoped);
///
/// struct SiteGreeter(String);
/// impl Greeter for SiteGreeter {
///   fn greet(&self) -> String {
///     format!("Welcome to {}", self.0)
///   }
/// }
///
/// let greeter = ImplementationType::of::<SiteGreeter>().provides::<dyn Greeter>(|activation| {
///   Arc::new(SiteGreeter(activation.site().unwrap_or_default().to_string()))
/// });
///
/// let registry = Registry::builder().loader(Catalog::new()).build();
/// registry.register_scopes(["site1"], &[greeter], None);
/// registry.build().unwrap();
///
/// let greeter = registry.site_service::<dyn Greeter>("site1").unwrap();
/// assert_eq!(greeter.greet(), "Welcome to site1");
/// assert!(registry.lookup::<dyn Greeter>(ScopeKey::Root).is_err());
/// ```
pub struct Registry {
  discovery: Discovery,
  duplicates: DuplicatePolicy,
  collections: DashMap<ScopeKey, Arc<Mutex<Slot>>>,
  providers: DashMap<ScopeKey, Arc<ServiceProvider>>,
}

impl Registry {
  /// A registry discovering through [`InventoryLoader`] with default settings.
  pub fn new() -> Self {
    Self::builder().build()
  }

  pub fn builder() -> RegistryBuilder {
    RegistryBuilder::default()
  }

  pub fn discovery(&self) -> &Discovery {
    &self.discovery
  }

  // --- Discovery ---

  /// Discovers the selected types and drops superseded and deprecated ones.
  pub fn discover(&self, selection: &Selection) -> Result<Vec<ImplementationType>> {
    Ok(resolve_overrides(self.discovery.discover(selection)?))
  }

  // --- Registration ---

  /// Binds the candidates' root capabilities into the root collection.
  pub fn register_root(&self, candidates: &[ImplementationType], log: Option<&dyn Log>) {
    self.with_open(&ScopeKey::Root, |collection| {
      bind_root(collection, candidates, log)
    });
  }

  /// Registers each distinct, non-empty site in `sites`.
  pub fn register_scopes<I>(
    &self,
    sites: I,
    candidates: &[ImplementationType],
    log: Option<&dyn Log>,
  )
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    for site in distinct_sites(sites) {
      self.register_site(&site, candidates, log);
    }
  }

  /// Registers a single site. `None` and `""` are silently ignored.
  pub fn register_scope(
    &self,
    site: Option<&str>,
    candidates: &[ImplementationType],
    log: Option<&dyn Log>,
  ) {
    match site {
      Some(site) if !site.is_empty() => self.register_site(site, candidates, log),
      _ => {}
    }
  }

  fn register_site(&self, site: &str, candidates: &[ImplementationType], log: Option<&dyn Log>) {
    self.with_open(&ScopeKey::site(site), |collection| {
      bind_scope(collection, candidates, site, log)
    });
  }

  /// Discovers once, then registers the root and every site.
  pub fn register_services<I>(
    &self,
    sites: I,
    selection: &Selection,
    log: Option<&dyn Log>,
  ) -> Result<()>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let candidates = self.discover(selection)?;
    self.register_root(&candidates, log);
    self.register_scopes(sites, &candidates, log);
    Ok(())
  }

  pub fn register_root_from(&self, selection: &Selection, log: Option<&dyn Log>) -> Result<()> {
    let candidates = self.discover(selection)?;
    self.register_root(&candidates, log);
    Ok(())
  }

  /// Like [`Registry::register_scopes`], discovering first. Nothing is
  /// discovered when no usable site is given.
  pub fn register_scopes_from<I>(
    &self,
    sites: I,
    selection: &Selection,
    log: Option<&dyn Log>,
  ) -> Result<()>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let sites = distinct_sites(sites);
    if sites.is_empty() {
      return Ok(());
    }
    let candidates = self.discover(selection)?;
    self.register_scopes(sites, &candidates, log);
    Ok(())
  }

  pub fn register_scope_from(
    &self,
    site: Option<&str>,
    selection: &Selection,
    log: Option<&dyn Log>,
  ) -> Result<()> {
    let Some(site) = site.filter(|site| !site.is_empty()) else {
      return Ok(());
    };
    let candidates = self.discover(selection)?;
    self.register_site(site, &candidates, log);
    Ok(())
  }

  /// Performs the discovery and registration a configuration describes.
  ///
  /// Discovery scans the configuration's foundation units. The duplicate
  /// policy is fixed when the registry is created, so a configuration asking
  /// for a different one is rejected before anything is registered; create
  /// the registry with [`RegistryBuilder::config`] to apply it.
  pub fn register_from_config(&self, config: &RegistryConfig, log: Option<&dyn Log>) -> Result<()> {
    if config.duplicates != self.duplicates {
      return Err(Error::InvalidConfigValue {
        field: "duplicates".to_string(),
        message: format!(
          "registry was created with {:?} but the configuration asks for {:?}",
          self.duplicates, config.duplicates
        ),
      });
    }

    let discovery = self
      .discovery
      .clone()
      .with_foundation(config.foundation.iter().cloned());
    let candidates = resolve_overrides(discovery.discover(&config.selection)?);

    if config.register_root {
      self.register_root(&candidates, log);
    }
    self.register_scopes(&config.scopes, &candidates, log);
    Ok(())
  }

  /// Runs `bind` against the target's open collection, creating it first if
  /// needed. Targets that are already built are left untouched.
  fn with_open(&self, key: &ScopeKey, bind: impl FnOnce(&mut ServiceCollection) -> usize) {
    let slot = self.slot(key);
    let mut slot = slot.lock();
    match &mut *slot {
      Slot::Open(collection) => {
        let bound = bind(collection);
        tracing::debug!(scope = %key, bound, "registered bindings");
      }
      Slot::Built => {
        tracing::warn!(scope = %key, "scope is already built; registration ignored");
      }
    }
  }

  fn slot(&self, key: &ScopeKey) -> Arc<Mutex<Slot>> {
    let entry = self.collections.entry(key.clone()).or_insert_with(|| {
      tracing::debug!(scope = %key, "creating binding collection");
      Arc::new(Mutex::new(Slot::Open(seed_collection(key))))
    });
    Arc::clone(entry.value())
  }

  // --- Build ---

  /// Builds a resolution context for every collection that does not have
  /// one yet. Returns how many contexts were built by this call.
  ///
  /// Already-built targets are skipped, so calling this repeatedly is safe.
  /// A target whose bindings conflict stays open and unbuilt; it never keeps
  /// another target from being built. If any target failed, the call returns
  /// [`Error::Build`] with every failure once all other targets are built.
  pub fn build(&self) -> Result<usize> {
    let pending: Vec<(ScopeKey, Arc<Mutex<Slot>>)> = self
      .collections
      .iter()
      .filter(|entry| !self.providers.contains_key(entry.key()))
      .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
      .collect();

    let mut built = 0;
    let mut failures = Vec::new();
    for (key, slot) in pending {
      match self.build_slot(&key, &slot) {
        Ok(true) => built += 1,
        Ok(false) => {}
        Err(err) => {
          tracing::warn!(scope = %key, error = %err, "failed to build resolution context");
          failures.push(err);
        }
      }
    }

    if failures.is_empty() {
      Ok(built)
    } else {
      Err(Error::Build { built, failures })
    }
  }

  /// Builds one target. `Ok(false)` means another caller already built it.
  fn build_slot(&self, key: &ScopeKey, slot: &Mutex<Slot>) -> Result<bool> {
    let mut slot = slot.lock();
    let Slot::Open(collection) = &*slot else {
      return Ok(false);
    };

    let bindings = collection.len();
    let provider = collection
      .clone()
      .build(self.duplicates)
      .map_err(|err| Error::from_build(key, err))?;

    // Published while the slot is locked, so no reader or builder can see
    // the target as open and built at once.
    self.providers.insert(key.clone(), Arc::new(provider));
    *slot = Slot::Built;
    tracing::info!(scope = %key, bindings, "built resolution context");
    Ok(true)
  }

  // --- Lookup ---

  pub fn status(&self, scope: impl Into<ScopeKey>) -> ScopeStatus {
    let scope = scope.into();
    ScopeStatus {
      collection_exists: self.collections.contains_key(&scope),
      context_built: self.providers.contains_key(&scope),
    }
  }

  /// Resolves capability `C` from the built context of `scope`.
  pub fn lookup<C: Capability + ?Sized>(&self, scope: impl Into<ScopeKey>) -> Result<Arc<C>> {
    let scope = scope.into();
    let provider = self.provider(&scope)?;
    provider
      .require::<C>()
      .map_err(|err| Error::from_resolve(&scope, err))
  }

  pub fn root_service<C: Capability + ?Sized>(&self) -> Result<Arc<C>> {
    self.lookup::<C>(ScopeKey::Root)
  }

  pub fn site_service<C: Capability + ?Sized>(&self, site: &str) -> Result<Arc<C>> {
    self.lookup::<C>(ScopeKey::site(site))
  }

  /// The built context of `scope`.
  pub fn provider(&self, scope: &ScopeKey) -> Result<Arc<ServiceProvider>> {
    self
      .providers
      .get(scope)
      .map(|provider| Arc::clone(provider.value()))
      .ok_or_else(|| Error::ScopeNotRegistered(scope.to_string()))
  }

  /// Every target with a binding collection, root first, then sites by name.
  pub fn scopes(&self) -> Vec<ScopeKey> {
    let mut scopes: Vec<ScopeKey> = self
      .collections
      .iter()
      .map(|entry| entry.key().clone())
      .collect();
    scopes.sort();
    scopes
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("foundation", &self.discovery.foundation())
      .field("duplicates", &self.duplicates)
      .field("collections", &self.collections.len())
      .field("providers", &self.providers.len())
      .finish_non_exhaustive()
  }
}

/// A site collection starts with the binding that exposes its own identity.
fn seed_collection(key: &ScopeKey) -> ServiceCollection {
  let mut collection = ServiceCollection::new();
  if let Some(site) = key.as_site() {
    let site = site.to_string();
    collection.add(ServiceDescriptor::singleton::<dyn TenantScope>(
      InjectionKey::of::<SiteScope>(),
      move || Arc::new(SiteScope::new(site.clone())),
    ));
  }
  collection
}

fn distinct_sites<I>(sites: I) -> Vec<String>
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  let mut seen = HashSet::new();
  sites
    .into_iter()
    .map(|site| site.as_ref().to_string())
    .filter(|site| !site.is_empty() && seen.insert(site.clone()))
    .collect()
}

/// Configures and creates a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
  loader: Option<Arc<dyn UnitLoader>>,
  foundation: Option<Vec<String>>,
  duplicates: DuplicatePolicy,
}

impl RegistryBuilder {
  pub fn loader(self, loader: impl UnitLoader + 'static) -> Self {
    self.shared_loader(Arc::new(loader))
  }

  pub fn shared_loader(mut self, loader: Arc<dyn UnitLoader>) -> Self {
    self.loader = Some(loader);
    self
  }

  /// Replaces the units appended to every discovery.
  pub fn foundation<I, S>(mut self, units: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.foundation = Some(units.into_iter().map(Into::into).collect());
    self
  }

  pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
    self.duplicates = policy;
    self
  }

  /// Applies the foundation units and duplicate policy from a configuration.
  pub fn config(self, config: &RegistryConfig) -> Self {
    self
      .foundation(config.foundation.iter().cloned())
      .duplicates(config.duplicates)
  }

  pub fn build(self) -> Registry {
    let loader = self.loader.unwrap_or_else(|| Arc::new(InventoryLoader));
    let mut discovery = Discovery::new(loader);
    if let Some(foundation) = self.foundation {
      discovery = discovery.with_foundation(foundation);
    }

    Registry {
      discovery,
      duplicates: self.duplicates,
      collections: DashMap::new(),
      providers: DashMap::new(),
    }
  }
}

impl fmt::Debug for RegistryBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RegistryBuilder")
      .field("has_loader", &self.loader.is_some())
      .field("foundation", &self.foundation)
      .field("duplicates", &self.duplicates)
      .finish()
  }
}
