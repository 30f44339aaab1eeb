//! The logging collaborator and the built-in `tracing` bridge.

use std::sync::Arc;

use crate::discovery::FOUNDATION_UNIT;
use crate::implementation::ImplementationType;

/// Receives informational diagnostics from the registry, such as one record
/// per successful binding.
///
/// Implementations must not panic. Passing `None` wherever an
/// `Option<&dyn Log>` is accepted disables these records.
pub trait Log: Send + Sync {
  fn info(&self, message: &str);

  fn warn(&self, message: &str) {
    self.info(message);
  }
}

crate::capability!(dyn Log => Root);

/// Forwards records to `tracing` under the `fibre_registry::bind` target.
///
/// Lives in the foundation unit, so every context built from a discovery
/// can resolve `dyn Log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl Log for TracingLog {
  fn info(&self, message: &str) {
    tracing::info!(target: "fibre_registry::bind", "{}", message);
  }

  fn warn(&self, message: &str) {
    tracing::warn!(target: "fibre_registry::bind", "{}", message);
  }
}

pub(crate) fn tracing_log_type() -> ImplementationType {
  ImplementationType::of::<TracingLog>().provides::<dyn Log>(|_| Arc::new(TracingLog))
}

crate::component!(FOUNDATION_UNIT, tracing_log_type);
