//! Type discovery: which units to scan, and which types they contribute.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::implementation::ImplementationType;
use crate::log::tracing_log_type;

/// The unit holding the registry's own implementations. It is always scanned.
pub const FOUNDATION_UNIT: &str = "fibre_registry";

/// Loads units (the modules or crates that contribute implementation types).
pub trait UnitLoader: Send + Sync {
  /// Every unit this loader can load; the dependency manifest that prefix
  /// selection filters.
  fn known_units(&self) -> Vec<String>;

  /// Every type declared by `unit`. Unknown units are an error.
  fn load(&self, unit: &str) -> Result<Vec<ImplementationType>>;
}

/// Which units a discovery should scan.
///
/// Explicit namespaces win; prefixes are only consulted when no namespace is
/// given. An empty selection discovers nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  pub namespaces: Vec<String>,
  pub prefixes: Vec<String>,
}

impl Selection {
  pub fn namespaces<I, S>(namespaces: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      namespaces: namespaces.into_iter().map(Into::into).collect(),
      prefixes: Vec::new(),
    }
  }

  pub fn prefixes<I, S>(prefixes: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      namespaces: Vec::new(),
      prefixes: prefixes.into_iter().map(Into::into).collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.namespaces.is_empty() && self.prefixes.is_empty()
  }
}

/// Resolves a [`Selection`] against a [`UnitLoader`].
#[derive(Clone)]
pub struct Discovery {
  loader: Arc<dyn UnitLoader>,
  foundation: Vec<String>,
}

impl Discovery {
  pub fn new(loader: Arc<dyn UnitLoader>) -> Self {
    Self {
      loader,
      foundation: vec![FOUNDATION_UNIT.to_string()],
    }
  }

  /// Replaces the units that are appended to every non-empty selection.
  pub fn with_foundation<I, S>(mut self, units: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.foundation = units.into_iter().map(Into::into).collect();
    self
  }

  pub fn foundation(&self) -> &[String] {
    &self.foundation
  }

  /// The deduplicated, ordered list of units a selection resolves to.
  pub fn effective_units(&self, selection: &Selection) -> Vec<String> {
    if selection.is_empty() {
      return Vec::new();
    }

    let mut units = if selection.namespaces.is_empty() {
      let prefixes = dedup(selection.prefixes.iter().cloned());
      dedup(
        self
          .loader
          .known_units()
          .into_iter()
          .filter(|unit| starts_with_any(unit, &prefixes)),
      )
    } else {
      selection.namespaces.clone()
    };

    units.extend(self.foundation.iter().cloned());
    dedup(units)
  }

  /// Loads every selected unit and returns its concrete types, in unit order
  /// then declaration order. Any unit failing to load fails the whole call.
  pub fn discover(&self, selection: &Selection) -> Result<Vec<ImplementationType>> {
    let mut seen = HashSet::new();
    let mut types = Vec::new();

    for unit in self.effective_units(selection) {
      let declared = self.loader.load(&unit)?;
      tracing::debug!(unit = %unit, types = declared.len(), "loaded unit");

      types.extend(
        declared
          .into_iter()
          .filter(|ty| !ty.is_abstract() && seen.insert(ty.key())),
      );
    }

    Ok(types)
  }
}

fn starts_with_any(name: &str, prefixes: &[String]) -> bool {
  prefixes.is_empty() || prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

fn dedup(items: impl IntoIterator<Item = String>) -> Vec<String> {
  let mut seen = HashSet::new();
  items
    .into_iter()
    .filter(|item| seen.insert(item.clone()))
    .collect()
}

// --- Loaders ---

/// An explicit, in-memory manifest of units.
///
/// `Catalog::new()` already contains the foundation unit; `Catalog::empty()`
/// does not.
#[derive(Clone, Default)]
pub struct Catalog {
  units: Vec<(String, Vec<ImplementationType>)>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::empty().unit(FOUNDATION_UNIT, [tracing_log_type()])
  }

  pub fn empty() -> Self {
    Self::default()
  }

  /// Adds types to `name`, creating the unit if needed.
  pub fn unit<S, I>(mut self, name: S, types: I) -> Self
  where
    S: Into<String>,
    I: IntoIterator<Item = ImplementationType>,
  {
    let name = name.into();
    match self.units.iter_mut().find(|(unit, _)| *unit == name) {
      Some((_, existing)) => existing.extend(types),
      None => self.units.push((name, types.into_iter().collect())),
    }
    self
  }
}

impl UnitLoader for Catalog {
  fn known_units(&self) -> Vec<String> {
    self.units.iter().map(|(name, _)| name.clone()).collect()
  }

  fn load(&self, unit: &str) -> Result<Vec<ImplementationType>> {
    self
      .units
      .iter()
      .find(|(name, _)| name == unit)
      .map(|(_, types)| types.clone())
      .ok_or_else(|| Error::UnitNotFound(unit.to_string()))
  }
}

/// A link-time registration of one implementation type into a unit.
///
/// Submit one with [`component!`](crate::component!); [`InventoryLoader`]
/// collects them.
pub struct Component {
  unit: &'static str,
  describe: fn() -> ImplementationType,
}

impl Component {
  pub const fn new(unit: &'static str, describe: fn() -> ImplementationType) -> Self {
    Self { unit, describe }
  }
}

inventory::collect!(Component);

/// Registers an implementation type with [`InventoryLoader`] at link time.
///
/// ```
/// use fibre_registry::{capability, component, ImplementationType};
/// use std::sync::Arc;
///
/// pub trait Clock: Send + Sync {
///   fn now(&self) -> u64;
/// }
/// capability!(dyn Clock => Root);
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///   fn now(&self) -> u64 {
///     42
///   }
/// }
///
/// fn fixed_clock() -> ImplementationType {
///   ImplementationType::of::<FixedClock>().provides::<dyn Clock>(|_| Arc::new(FixedClock))
/// }
///
/// component!("app.time", fixed_clock);
/// ```
#[macro_export]
macro_rules! component {
  ($unit:expr, $describe:path) => {
    $crate::inventory::submit! {
      $crate::Component::new($unit, $describe)
    }
  };
}

/// Loads units from every [`Component`] linked into the binary.
///
/// Types within a unit are ordered by type name, since link order is not
/// stable.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryLoader;

impl UnitLoader for InventoryLoader {
  fn known_units(&self) -> Vec<String> {
    let mut units: Vec<String> = inventory::iter::<Component>
      .into_iter()
      .map(|component| component.unit.to_string())
      .collect();
    units.sort_unstable();
    units.dedup();
    units
  }

  fn load(&self, unit: &str) -> Result<Vec<ImplementationType>> {
    let mut types: Vec<ImplementationType> = inventory::iter::<Component>
      .into_iter()
      .filter(|component| component.unit == unit)
      .map(|component| (component.describe)())
      .collect();

    if types.is_empty() {
      return Err(Error::UnitNotFound(unit.to_string()));
    }

    types.sort_by_key(|ty| ty.name());
    Ok(types)
  }
}
