use fibre_container::{
  resolve, DuplicatePolicy, InjectionKey, Lifetime, ResolveError, ServiceCollection,
};
use std::sync::Arc;

// --- Test Fixtures ---

// The trait must be Send + Sync for the container to accept it.
trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

// --- Basic Tests ---

#[test]
fn test_singleton_factory() {
  // Arrange
  let mut services = ServiceCollection::new();
  services.add_singleton(|| Arc::new(SimpleService { id: 101 }));
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  // Act
  let r1 = provider.get::<SimpleService>().unwrap();
  let r2 = provider.get::<SimpleService>().unwrap();

  // Assert
  assert_eq!(r1.id, 101);
  // Ensure it's a singleton by checking pointer equality.
  assert!(Arc::ptr_eq(&r1, &r2));
  assert_eq!(provider.lifetime_of::<SimpleService>(), Some(Lifetime::Singleton));
}

#[test]
fn test_transient_factory() {
  // Arrange
  let mut services = ServiceCollection::new();
  services.add_transient(|| Arc::new(SimpleService { id: 303 }));
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  // Act
  let r1 = provider.get::<SimpleService>().unwrap();
  let r2 = provider.get::<SimpleService>().unwrap();

  // Assert
  assert_eq!(r1.id, 303);
  assert_eq!(r2.id, 303);
  // Ensure it's a transient by checking the pointers are different.
  assert!(!Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_instance_registration() {
  let mut services = ServiceCollection::new();
  services.add_instance(SimpleService { id: 202 });
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  let r1 = provider.get::<SimpleService>().unwrap();
  let r2 = provider.get::<SimpleService>().unwrap();
  assert_eq!(*r1, SimpleService { id: 202 });
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_trait_resolution() {
  let mut services = ServiceCollection::new();
  services.add_singleton::<dyn Greeter, _>(|| Arc::new(EnglishGreeter));
  let provider = services.build(DuplicatePolicy::Reject).unwrap();

  let greeter = resolve!(provider, trait Greeter).unwrap();

  assert_eq!(greeter.greet(), "Hello!");
  assert!(provider.contains::<dyn Greeter>());
  assert_eq!(provider.len(), 1);
}

#[test]
fn test_missing_service_is_not_bound() {
  struct MissingService;
  let provider = ServiceCollection::new()
    .build(DuplicatePolicy::Reject)
    .unwrap();

  assert!(provider.is_empty());
  assert!(provider.get::<MissingService>().is_none());
  assert_eq!(
    resolve!(provider, MissingService).err(),
    Some(ResolveError::NotBound(InjectionKey::of::<MissingService>()))
  );
}

#[test]
fn test_missing_trait_error_names_the_service() {
  trait MissingTrait: Send + Sync {}
  let provider = ServiceCollection::new()
    .build(DuplicatePolicy::Reject)
    .unwrap();

  let err = match resolve!(provider, trait MissingTrait) {
    Ok(_) => panic!("an unbound trait must not resolve"),
    Err(err) => err,
  };
  assert!(err.to_string().contains("MissingTrait"));
}

#[test]
fn test_collection_queries() {
  let mut services = ServiceCollection::new();
  assert!(services.is_empty());

  services.add_singleton::<dyn Greeter, _>(|| Arc::new(EnglishGreeter));

  assert_eq!(services.len(), 1);
  assert!(services.contains::<dyn Greeter>());
  assert!(!services.contains::<SimpleService>());

  let descriptor = services.descriptors().next().unwrap();
  assert_eq!(descriptor.service(), InjectionKey::of::<dyn Greeter>());
  assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
}
