mod common;

use common::*;
use fibre_registry::{ImplementationType, ScopeKey, Selection};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 16;

#[test]
fn test_concurrent_registration_of_one_site_creates_one_collection() {
  let registry = Arc::new(registry_with(app_catalog()));
  let barrier = Arc::new(Barrier::new(THREADS));

  let handles: Vec<_> = (0..THREADS)
    .map(|_| {
      let registry = Arc::clone(&registry);
      let barrier = Arc::clone(&barrier);
      thread::spawn(move || {
        barrier.wait();
        registry.register_scope(Some("shared-site"), &[greeter_impl()], None);
      })
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(registry.scopes(), vec![ScopeKey::site("shared-site")]);
  assert_eq!(registry.build().unwrap(), 1);
  assert_eq!(
    registry.site_service::<dyn Greeter>("shared-site").unwrap().greet(),
    "Hello from shared-site"
  );
}

#[test]
fn test_concurrent_builds_build_each_context_once() {
  let registry = Arc::new(registry_with(app_catalog()));
  let sites: Vec<String> = (0..8).map(|i| format!("site{}", i)).collect();
  registry
    .register_services(&sites, &Selection::prefixes(["app."]), None)
    .unwrap();

  let barrier = Arc::new(Barrier::new(THREADS));
  let handles: Vec<_> = (0..THREADS)
    .map(|_| {
      let registry = Arc::clone(&registry);
      let barrier = Arc::clone(&barrier);
      thread::spawn(move || {
        barrier.wait();
        registry.build().unwrap()
      })
    })
    .collect();

  let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
  assert_eq!(total, sites.len() + 1);

  for site in &sites {
    assert!(registry.status(site.as_str()).context_built);
  }
  assert!(registry.status(ScopeKey::Root).context_built);
}

#[test]
fn test_concurrent_lookups_share_one_instance_per_context() {
  static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

  struct CountedGreeter;
  impl Greeter for CountedGreeter {
    fn greet(&self) -> String {
      "counted".to_string()
    }
  }
  let counted = ImplementationType::of::<CountedGreeter>().provides::<dyn Greeter>(|_| {
    CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
    Arc::new(CountedGreeter)
  });

  let registry = Arc::new(registry_with(app_catalog()));
  registry.register_scopes(["A", "B"], &[counted], None);
  registry.build().unwrap();

  let barrier = Arc::new(Barrier::new(THREADS));
  let handles: Vec<_> = (0..THREADS)
    .map(|i| {
      let registry = Arc::clone(&registry);
      let barrier = Arc::clone(&barrier);
      thread::spawn(move || {
        barrier.wait();
        let site = if i % 2 == 0 { "A" } else { "B" };
        (site, registry.site_service::<dyn Greeter>(site).unwrap())
      })
    })
    .collect();

  let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  for (site, greeter) in &resolved {
    let first = resolved
      .iter()
      .find(|(other, _)| other == site)
      .map(|(_, greeter)| greeter)
      .unwrap();
    assert!(Arc::ptr_eq(first, greeter));
  }
  assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 2);
}
