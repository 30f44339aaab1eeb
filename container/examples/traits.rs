use fibre_container::{resolve, DuplicatePolicy, ResolveError, ServiceCollection};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  // --- Registration ---
  // The collection stores Arc<ConsoleLogger> but serves it as Arc<dyn Logger>.
  let mut services = ServiceCollection::new();
  services.add_singleton::<dyn Logger, _>(|| Arc::new(ConsoleLogger));

  // --- Build ---
  // The collection is consumed; the provider is immutable from here on.
  let provider = services.build(DuplicatePolicy::Reject)?;

  // --- Resolution and Usage ---
  let logger = resolve!(provider, trait Logger)?;
  logger.log("Resolved through the provider.");

  // A missing service is an error value, not a panic.
  match resolve!(provider, String) {
    Err(ResolveError::NotBound(key)) => println!("Correctly reported missing service: {}", key),
    Ok(_) => unreachable!("String was never registered"),
  }

  Ok(())
}
