//! Supersession and deprecation filtering.

use fibre_container::InjectionKey;
use std::collections::HashSet;

use crate::implementation::ImplementationType;

/// Removes every type named by a `supersedes` marker and every deprecated
/// type from `candidates`, keeping the order of the rest.
///
/// Only the exact type a marker names is removed: there is no walk up an
/// inheritance chain, and a type superseded by two others is simply removed
/// once.
pub fn resolve_overrides(candidates: Vec<ImplementationType>) -> Vec<ImplementationType> {
  let excluded: HashSet<InjectionKey> = candidates
    .iter()
    .filter_map(ImplementationType::superseded)
    .chain(
      candidates
        .iter()
        .filter(|candidate| candidate.is_deprecated())
        .map(ImplementationType::key),
    )
    .collect();

  if excluded.is_empty() {
    return candidates;
  }

  candidates
    .into_iter()
    .filter(|candidate| !excluded.contains(&candidate.key()))
    .collect()
}
