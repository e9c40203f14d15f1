//! # Palisade Config
//!
//! Typed, load-once configuration for the Palisade edge gateway.
//!
//! [`GatewayConfig`] is constructed once at process startup and is
//! read-only afterwards; every filter stage receives it by shared
//! reference, so concurrent reads need no locking. There are no
//! module-level globals and no hot-reload: a policy change is a restart.
//!
//! Loading is layered via [`ConfigLoader`]:
//!
//! 1. Compiled-in defaults
//! 2. A TOML or JSON configuration file
//! 3. Environment variable overrides (`PREFIX__SECTION__KEY`)

#![doc(html_root_url = "https://docs.rs/palisade-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{
    AuthConfig, CorsConfig, GatewayConfig, GatewayConfigBuilder, PolicyConfig, PolicyEntry,
};
pub use error::ConfigError;
pub use loader::ConfigLoader;
