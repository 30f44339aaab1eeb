#![allow(dead_code)]

use fibre_registry::{capability, Catalog, ImplementationType, Log, Registry};
use parking_lot::Mutex;
use std::sync::Arc;

// --- Capabilities ---

pub trait Logger: Send + Sync {
  fn name(&self) -> &'static str;
}
capability!(dyn Logger => Root);

pub trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}
capability!(dyn Greeter => Scoped);

pub trait Pricing: Send + Sync {
  fn price(&self) -> u32;
}
capability!(dyn Pricing => Scoped);

pub trait Internal: Send + Sync {}
capability!(dyn Internal => Unregistered);

// --- Implementations ---

pub struct LoggerImpl;
impl Logger for LoggerImpl {
  fn name(&self) -> &'static str {
    "LoggerImpl"
  }
}
impl Internal for LoggerImpl {}

/// Greets with the site it was activated for.
pub struct GreeterImpl {
  site: String,
}
impl Greeter for GreeterImpl {
  fn greet(&self) -> String {
    format!("Hello from {}", self.site)
  }
}

pub struct StandardPricing;
impl Pricing for StandardPricing {
  fn price(&self) -> u32 {
    100
  }
}

pub struct PremiumPricing;
impl Pricing for PremiumPricing {
  fn price(&self) -> u32 {
    250
  }
}

pub fn logger_impl() -> ImplementationType {
  ImplementationType::of::<LoggerImpl>()
    .provides::<dyn Logger>(|_| Arc::new(LoggerImpl))
    .provides::<dyn Internal>(|_| Arc::new(LoggerImpl))
}

pub fn greeter_impl() -> ImplementationType {
  ImplementationType::of::<GreeterImpl>().provides::<dyn Greeter>(|activation| {
    Arc::new(GreeterImpl {
      site: activation.scope().to_string(),
    })
  })
}

pub fn standard_pricing() -> ImplementationType {
  ImplementationType::of::<StandardPricing>().provides::<dyn Pricing>(|_| Arc::new(StandardPricing))
}

pub fn premium_pricing() -> ImplementationType {
  ImplementationType::of::<PremiumPricing>()
    .provides::<dyn Pricing>(|_| Arc::new(PremiumPricing))
    .supersedes::<StandardPricing>()
}

/// The usual application catalog: a root logger, a per-site greeter and a
/// pricing service whose premium flavour supersedes the standard one.
pub fn app_catalog() -> Catalog {
  Catalog::new()
    .unit("app.logging", [logger_impl()])
    .unit("app.sites", [greeter_impl(), standard_pricing(), premium_pricing()])
}

pub fn registry_with(catalog: Catalog) -> Registry {
  Registry::builder().loader(catalog).build()
}

/// A `Log` that remembers every record it receives.
#[derive(Default)]
pub struct RecordingLog {
  records: Mutex<Vec<String>>,
}

impl RecordingLog {
  pub fn records(&self) -> Vec<String> {
    self.records.lock().clone()
  }
}

impl Log for RecordingLog {
  fn info(&self, message: &str) {
    self.records.lock().push(message.to_string());
  }
}
