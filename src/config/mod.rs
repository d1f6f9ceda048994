#[cfg(feature = "cli")]
pub mod cli;
pub mod policy;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
pub use policy::{DefaultTiers, PricingPolicy};
pub use toml_config::QuoteConfig;
