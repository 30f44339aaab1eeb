//! # Fibre Registry
//!
//! A multi-tenant capability registry built on `fibre_container`.
//!
//! Implementation types declare which capabilities (trait objects) they
//! provide. The registry discovers them from a set of units, drops the ones
//! that are superseded or deprecated, and binds the rest into isolated
//! resolution contexts: one shared root context and one per site.
//!
//! ## Core Concepts
//!
//! - **Capability**: a `dyn Trait` declared with [`capability!`] as `Root`
//!   (shared, also bound into every site), `Scoped` (per site only) or
//!   `Unregistered` (never bound).
//! - **Implementation type**: an [`ImplementationType`] carrying factories
//!   plus its supersession, deprecation and site allow-list markers.
//! - **Unit**: a named group of implementation types, served by a
//!   [`UnitLoader`] such as [`Catalog`] or [`InventoryLoader`].
//! - **Build**: [`Registry::build`] turns every open collection into an
//!   immutable context exactly once.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_registry::{capability, Catalog, ImplementationType, Registry, Selection};
//! use std::sync::Arc;
//!
//! pub trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//! capability!(dyn Greeter => Scoped);
//!
//! struct EnglishGreeter;
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     "Hello!".to_string()
//!   }
//! }
//!
//! let catalog = Catalog::new().unit(
//!   "app.greeting",
//!   [ImplementationType::of::<EnglishGreeter>()
//!     .provides::<dyn Greeter>(|_| Arc::new(EnglishGreeter))],
//! );
//!
//! let registry = Registry::builder().loader(catalog).build();
//! registry
//!   .register_services(["site1"], &Selection::prefixes(["app."]), None)
//!   .unwrap();
//! registry.build().unwrap();
//!
//! let greeter = registry.site_service::<dyn Greeter>("site1").unwrap();
//! assert_eq!(greeter.greet(), "Hello!");
//! ```

pub mod binder;
mod capability;
pub mod config;
mod discovery;
mod error;
mod implementation;
mod log;
pub mod overrides;
mod registry;
mod scope;

pub use capability::{Capability, CapabilityInfo};
pub use config::{find_config_file, RegistryConfig};
pub use discovery::{
  Catalog, Component, Discovery, InventoryLoader, Selection, UnitLoader, FOUNDATION_UNIT,
};
pub use error::{Error, Result};
pub use implementation::{Activation, ImplementationType, ProvidedCapability};
pub use log::{Log, TracingLog};
pub use registry::{Registry, RegistryBuilder};
pub use scope::{ScopeKey, ScopeStatus, ScopeType, SiteScope, TenantScope};

pub use fibre_container::{DuplicatePolicy, ServiceProvider};

#[doc(hidden)]
pub use inventory;
