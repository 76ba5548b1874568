//! Configuration module for sbom-convert.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust
//! use sbom_convert::config::{AppConfig, SerialNumberMode};
//!
//! // Use defaults
//! let config = AppConfig::default();
//! assert!(config.convert.pretty);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .validate(true)
//!     .serial_number(SerialNumberMode::ContentHash)
//!     .build();
//! assert!(config.convert.validate);
//! ```
//!
//! # Configuration File
//!
//! Place a `.sbom-convert.yaml` file in your project root or `~/.config/sbom-convert/`:
//!
//! ```yaml
//! convert:
//!   validate: true
//!   serial_number: content-hash
//! ```

pub mod file;
mod types;
mod validation;

// Re-export main types
pub use types::{
    AppConfig, AppConfigBuilder, CliOverrides, ConvertOptions, OutputConfig, SerialNumberMode,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    user_config_dir, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// The schema documents every option that can be set in a
/// `.sbom-convert.yaml` file, for editor validation and autocompletion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| crate::error::ConvertError::config(e.to_string()))
}
