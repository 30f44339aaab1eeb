//! Public macros for ergonomic service resolution.

/// Resolves a service from a built `ServiceProvider`.
///
/// Expands to a `Result<Arc<_>, ResolveError>`, so it composes with `?`.
///
/// # Examples
///
/// ```
/// use fibre_container::{resolve, ServiceCollection, DuplicatePolicy};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton::<dyn Greeter, _>(|| Arc::new(EnglishGreeter));
/// let provider = services.build(DuplicatePolicy::Reject).unwrap();
///
/// let greeter = resolve!(provider, trait Greeter).unwrap();
/// assert_eq!(greeter.greet(), "Hello!");
///
/// // Concrete service types resolve the same way.
/// assert!(resolve!(provider, String).is_err());
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving a trait object: resolve!(provider, trait MyTrait)
  // `:ident` captures the trait's name so `dyn Trait` can be built here.
  ($provider:expr, trait $trait_ident:ident) => {
    $provider.require::<dyn $trait_ident>()
  };

  // Arm for resolving a concrete type: resolve!(provider, MyService)
  ($provider:expr, $type:ty) => {
    $provider.require::<$type>()
  };
}
