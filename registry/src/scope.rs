//! Scope classification, scope keys and the intrinsic per-site identity.

use std::fmt;

/// The declared reach of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeType {
  /// Never bound by the registry.
  Unregistered,
  /// Bound once at root and duplicated into every site.
  Root,
  /// Bound per site only.
  Scoped,
}

/// Identifies one binding target: the shared root or a single site.
///
/// Root is its own variant, so no site name can collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeKey {
  Root,
  Site(String),
}

impl ScopeKey {
  pub fn site(name: impl Into<String>) -> Self {
    ScopeKey::Site(name.into())
  }

  pub fn is_root(&self) -> bool {
    matches!(self, ScopeKey::Root)
  }

  /// The site name, or `None` for root.
  pub fn as_site(&self) -> Option<&str> {
    match self {
      ScopeKey::Root => None,
      ScopeKey::Site(name) => Some(name),
    }
  }
}

impl fmt::Display for ScopeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScopeKey::Root => f.write_str("<root>"),
      ScopeKey::Site(name) => f.write_str(name),
    }
  }
}

impl From<&str> for ScopeKey {
  fn from(name: &str) -> Self {
    ScopeKey::Site(name.to_owned())
  }
}

impl From<String> for ScopeKey {
  fn from(name: String) -> Self {
    ScopeKey::Site(name)
  }
}

/// The answer to `Registry::status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStatus {
  pub collection_exists: bool,
  pub context_built: bool,
}

/// The identity of the site a context was built for.
///
/// Every site context binds `dyn TenantScope` to its own [`SiteScope`].
pub trait TenantScope: Send + Sync {
  fn name(&self) -> &str;
}

crate::capability!(dyn TenantScope => Unregistered);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
  name: String,
}

impl SiteScope {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl TenantScope for SiteScope {
  fn name(&self) -> &str {
    &self.name
  }
}
