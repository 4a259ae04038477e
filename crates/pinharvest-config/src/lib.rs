//! # pinharvest Config
//!
//! Configuration management for pinharvest: a TOML file with `${VAR}`
//! expansion, per-field defaults and validation.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
