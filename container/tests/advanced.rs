use fibre_container::{
  BuildError, DuplicatePolicy, InjectionKey, ServiceCollection, ServiceDescriptor,
};
use pretty_assertions::assert_eq;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::thread;

trait OverwriteTrait: Send + Sync {
  fn name(&self) -> &str;
}
struct English;
impl OverwriteTrait for English {
  fn name(&self) -> &str {
    "English"
  }
}
struct German;
impl OverwriteTrait for German {
  fn name(&self) -> &str {
    "German"
  }
}

fn english() -> ServiceDescriptor {
  ServiceDescriptor::singleton::<dyn OverwriteTrait>(InjectionKey::of::<English>(), || {
    Arc::new(English)
  })
}

fn german() -> ServiceDescriptor {
  ServiceDescriptor::singleton::<dyn OverwriteTrait>(InjectionKey::of::<German>(), || {
    Arc::new(German)
  })
}

#[test]
fn test_conflicting_implementations_are_rejected() {
  let mut services = ServiceCollection::new();
  services.add(english()).add(german());

  let err = services.build(DuplicatePolicy::Reject).unwrap_err();

  assert_eq!(
    err,
    BuildError::DuplicateBinding {
      service: InjectionKey::of::<dyn OverwriteTrait>(),
      existing: InjectionKey::of::<English>(),
      duplicate: InjectionKey::of::<German>(),
    }
  );
  assert!(err.to_string().contains("German"));
}

#[test]
fn test_last_registration_wins_when_allowed() {
  let mut services = ServiceCollection::new();
  services.add(english()).add(german());

  let provider = services.build(DuplicatePolicy::LastWins).unwrap();

  assert_eq!(provider.get::<dyn OverwriteTrait>().unwrap().name(), "German");
  assert_eq!(
    provider.implementation_of::<dyn OverwriteTrait>(),
    Some(InjectionKey::of::<German>())
  );
}

#[test]
fn test_repeated_implementation_is_not_a_conflict() {
  let mut services = ServiceCollection::new();
  services.add(english()).add(english());
  assert_eq!(services.len(), 2);

  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  assert_eq!(provider.len(), 1);
  assert_eq!(provider.get::<dyn OverwriteTrait>().unwrap().name(), "English");
}

#[test]
fn test_providers_built_from_clones_are_isolated() {
  // Every build owns its own singletons, even from identical bindings.
  let mut services = ServiceCollection::new();
  services.add(english());

  let first = services.clone().build(DuplicatePolicy::Reject).unwrap();
  let second = services.build(DuplicatePolicy::Reject).unwrap();

  let a = first.get::<dyn OverwriteTrait>().unwrap();
  let b = second.get::<dyn OverwriteTrait>().unwrap();
  assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_singleton_factory_is_called_only_once_under_concurrency() {
  static FACTORY_EXECUTION_COUNT: AtomicUsize = AtomicUsize::new(0);

  struct ConcurrentService;

  let mut services = ServiceCollection::new();
  services.add_singleton(|| {
    FACTORY_EXECUTION_COUNT.fetch_add(1, Ordering::SeqCst);
    // Simulate some work to widen the window for a race.
    thread::sleep(std::time::Duration::from_millis(50));
    Arc::new(ConcurrentService)
  });
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  thread::scope(|s| {
    for _ in 0..20 {
      s.spawn(|| {
        let _service = provider.get::<ConcurrentService>().unwrap();
      });
    }
  });

  assert_eq!(FACTORY_EXECUTION_COUNT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_singleton_is_created_lazily() {
  static CREATED: AtomicUsize = AtomicUsize::new(0);

  struct LazyService;

  let mut services = ServiceCollection::new();
  services.add_singleton(|| {
    CREATED.fetch_add(1, Ordering::SeqCst);
    Arc::new(LazyService)
  });
  let provider = services.build(DuplicatePolicy::Reject).unwrap();
  assert_eq!(CREATED.load(Ordering::SeqCst), 0);

  provider.get::<LazyService>().unwrap();
  provider.get::<LazyService>().unwrap();
  assert_eq!(CREATED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_behavior_of_singletons() {
  static DROP_COUNTER: AtomicUsize = AtomicUsize::new(0);

  struct ConnectionPool;
  impl Drop for ConnectionPool {
    fn drop(&mut self) {
      DROP_COUNTER.fetch_add(1, Ordering::SeqCst);
    }
  }

  let mut services = ServiceCollection::new();
  services.add_singleton(|| Arc::new(ConnectionPool));
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  // The provider keeps the singleton alive after callers drop their handle.
  let pool = provider.get::<ConnectionPool>().unwrap();
  drop(pool);
  assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 0);

  drop(provider);
  assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 1);
}

#[test]
fn test_services_lists_every_bound_key() {
  struct Other;
  let mut services = ServiceCollection::new();
  services.add(english());
  services.add_transient(|| Arc::new(Other));
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  let mut names: Vec<&str> = provider.services().map(|key| key.type_name()).collect();
  names.sort_unstable();

  let mut expected = vec![
    InjectionKey::of::<dyn OverwriteTrait>().type_name(),
    InjectionKey::of::<Other>().type_name(),
  ];
  expected.sort_unstable();
  assert_eq!(names, expected);
}
