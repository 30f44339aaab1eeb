//! # Fibre Container
//!
//! A build-once, thread-safe service container keyed by type, usually by a
//! trait object such as `dyn Greeter`.
//!
//! Services are registered into a [`ServiceCollection`], an ordered and
//! mutable accumulator. Calling [`ServiceCollection::build`] consumes it and
//! returns a [`ServiceProvider`]: an immutable resolution context that can be
//! shared freely between threads.
//!
//! ## Core Concepts
//!
//! - **Service**: the type callers ask for, normally `dyn Trait`.
//! - **Implementation**: the identity of what provides a service. Registering
//!   the same implementation twice is not a conflict.
//! - **Lifetime**: singleton (one instance per provider) or transient.
//! - **Duplicate policy**: what a build does when two different
//!   implementations claim one service.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_container::{DuplicatePolicy, ServiceCollection};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     "Hello, World!".to_string()
//!   }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton::<dyn Greeter, _>(|| Arc::new(EnglishGreeter));
//!
//! let provider = services.build(DuplicatePolicy::Reject).unwrap();
//! let greeter = provider.get::<dyn Greeter>().unwrap();
//!
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

mod collection;
mod core;
mod error;
mod macros;
mod provider;

pub use collection::{DuplicatePolicy, ServiceCollection, ServiceDescriptor};
pub use crate::core::{InjectionKey, Lifetime};
pub use error::{BuildError, ResolveError};
pub use provider::ServiceProvider;
