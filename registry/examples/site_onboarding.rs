use fibre_registry::{
  capability, Catalog, ImplementationType, Registry, RegistryConfig, TracingLog,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// --- Capabilities ---

pub trait Clock: Send + Sync {
  fn now(&self) -> &'static str;
}
capability!(dyn Clock => Root);

pub trait Storefront: Send + Sync {
  fn banner(&self) -> String;
}
capability!(dyn Storefront => Scoped);

// --- Implementations ---

struct SystemClock;
impl Clock for SystemClock {
  fn now(&self) -> &'static str {
    "12:00"
  }
}

struct BasicStorefront(String);
impl Storefront for BasicStorefront {
  fn banner(&self) -> String {
    format!("Welcome to {}", self.0)
  }
}

struct HolidayStorefront(String);
impl Storefront for HolidayStorefront {
  fn banner(&self) -> String {
    format!("Happy holidays from {}!", self.0)
  }
}

fn catalog() -> Catalog {
  let site_name = |activation: &fibre_registry::Activation| {
    activation.site().unwrap_or_default().to_string()
  };

  Catalog::new()
    .unit(
      "shop.time",
      [ImplementationType::of::<SystemClock>().provides::<dyn Clock>(|_| Arc::new(SystemClock))],
    )
    .unit(
      "shop.front",
      [
        ImplementationType::of::<BasicStorefront>()
          .provides::<dyn Storefront>(move |a| Arc::new(BasicStorefront(site_name(a)))),
        // Only "winter" gets the seasonal front, and there it replaces the basic one.
        ImplementationType::of::<HolidayStorefront>()
          .provides::<dyn Storefront>(move |a| Arc::new(HolidayStorefront(site_name(a))))
          .sites(["winter"]),
      ],
    )
}

const CONFIG: &str = r#"
prefixes: ["shop."]
scopes: [summer, winter]
duplicates: last_wins
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .init();

  let config = RegistryConfig::from_yaml_str(CONFIG)?;
  let registry = Registry::builder().loader(catalog()).config(&config).build();

  registry.register_from_config(&config, Some(&TracingLog))?;
  let built = registry.build()?;
  println!("Built {} resolution contexts.", built);

  println!("Root clock: {}", registry.root_service::<dyn Clock>()?.now());
  for site in &config.scopes {
    let front = registry.site_service::<dyn Storefront>(site)?;
    println!("{}: {}", site, front.banner());
  }

  // Sites that were never registered are reported, not defaulted.
  if let Err(err) = registry.site_service::<dyn Storefront>("autumn") {
    println!("autumn: {}", err);
  }

  Ok(())
}
