//! Turns candidate implementation types into bindings for one target.

use fibre_container::ServiceCollection;

use crate::implementation::{Activation, ImplementationType, ProvidedCapability};
use crate::log::Log;
use crate::scope::{ScopeKey, ScopeType};

/// Binds every `Root` capability of every candidate into the root collection.
/// Returns the number of bindings added.
pub fn bind_root(
  collection: &mut ServiceCollection,
  candidates: &[ImplementationType],
  log: Option<&dyn Log>,
) -> usize {
  let target = ScopeKey::Root;
  let mut bound = 0;

  for candidate in candidates {
    for provided in candidate.capabilities() {
      if provided.info().scope() == ScopeType::Root {
        bind(collection, candidate, provided, &target, log);
        bound += 1;
      }
    }
  }

  bound
}

/// Binds every `Root` and `Scoped` capability of the candidates that apply to
/// `site` into that site's collection. Returns the number of bindings added.
///
/// Root capabilities are bound again here because a site context never falls
/// back to the root context.
pub fn bind_scope(
  collection: &mut ServiceCollection,
  candidates: &[ImplementationType],
  site: &str,
  log: Option<&dyn Log>,
) -> usize {
  let target = ScopeKey::site(site);
  let mut bound = 0;

  for candidate in candidates.iter().filter(|c| c.applies_to(site)) {
    for provided in candidate.capabilities() {
      if matches!(provided.info().scope(), ScopeType::Root | ScopeType::Scoped) {
        bind(collection, candidate, provided, &target, log);
        bound += 1;
      }
    }
  }

  bound
}

fn bind(
  collection: &mut ServiceCollection,
  candidate: &ImplementationType,
  provided: &ProvidedCapability,
  target: &ScopeKey,
  log: Option<&dyn Log>,
) {
  collection.add(provided.descriptor(candidate.key(), Activation::new(target.clone())));

  if let Some(log) = log {
    log.info(&format!(
      "{}-{}-{}",
      target,
      provided.info().name(),
      candidate.name()
    ));
  }
}
